//! Error types for the pre-upload hook pipeline
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Project file reading and parsing failures
//! - [`UploadError`]: Uploader process spawn and exit failures
//!
//! The unified [`Error`] enum wraps both domain errors and is returned
//! by the upload orchestrator. The flag filter itself has no failure
//! modes of its own; anything it surfaces comes from these domains.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Project configuration errors
///
/// These errors occur while loading the project file or while coercing
/// its fields into the upload environment.
#[derive(Debug)]
pub enum ConfigError {
    /// Project file could not be read
    Read {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// Project file is not valid TOML
    Parse {
        /// Path that failed to parse
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },
    /// A field is present but has the wrong TOML type
    WrongType {
        /// Dotted field name, e.g. `upload.flags`
        field: &'static str,
        /// Expected TOML type name
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
            ConfigError::WrongType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::WrongType { .. } => None,
        }
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Uploader process errors
///
/// These errors occur when the flashing tool cannot be started or
/// reports a failure through its exit status.
#[derive(Debug)]
pub enum UploadError {
    /// The uploader tool could not be spawned
    Spawn {
        /// Tool name as invoked
        tool: String,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The uploader tool ran but exited with a non-zero status
    Failed {
        /// Tool name as invoked
        tool: String,
        /// Exit status reported by the process
        status: ExitStatus,
    },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Spawn { tool, source } => {
                write!(f, "cannot spawn `{tool}`: {source}")
            }
            UploadError::Failed { tool, status } => {
                write!(f, "`{tool}` failed (status: {status})")
            }
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Spawn { source, .. } => Some(source),
            UploadError::Failed { .. } => None,
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps both domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::WrongType { .. })) => { /* ... */ }
///     Err(Error::Upload(UploadError::Spawn { .. })) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Upload error
    Upload(UploadError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {e}"),
            Error::Upload(e) => write!(f, "upload: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Upload(e) => Some(e),
        }
    }
}

// From impls for automatic conversion
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<UploadError> for Error {
    fn from(e: UploadError) -> Self {
        Error::Upload(e)
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for upload operations
pub type UploadResult<T> = std::result::Result<T, UploadError>;

// =============================================================================
// Unit Tests
// =============================================================================
