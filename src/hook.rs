//! Pre-upload hook interface
//!
//! This module defines the seam between the upload orchestrator and the
//! hooks that shape an upload before it runs. Hooks are registered
//! explicitly on the upload action (no implicit discovery) and invoked in
//! registration order, each receiving the upload descriptors and a mutable
//! reference to the caller-owned environment.

use std::path::{Path, PathBuf};

use crate::env::UploadEnvironment;
use crate::error::Result;

// =============================================================================
// Upload Context
// =============================================================================

/// Source/target descriptors for one upload invocation
///
/// Hooks receive this read-only; most treat it as opaque beyond logging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadContext {
    /// Build target name the hook fires on, e.g. `upload`
    pub target: String,
    /// Firmware image being flashed, if known at hook time
    pub image: Option<PathBuf>,
    /// Serial port the tool should use, if pinned by the caller
    pub port: Option<String>,
}

impl UploadContext {
    /// Create a context for the named build target
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            image: None,
            port: None,
        }
    }

    /// Set the firmware image path
    #[must_use]
    pub fn with_image(mut self, image: impl Into<PathBuf>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the serial port
    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// The firmware image path, if one was supplied
    #[must_use]
    pub fn image(&self) -> Option<&Path> {
        self.image.as_deref()
    }
}

// =============================================================================
// Pre-Upload Hook Trait
// =============================================================================

/// Trait for hooks that run immediately before the device upload step
///
/// Implementations may mutate the environment (they are the only writer
/// while their call is in flight) but must not assume any particular key
/// is present; an absent setting reads as empty.
///
/// # Example Implementation
///
/// ```ignore
/// struct ForceBaud;
///
/// impl PreUploadHook for ForceBaud {
///     fn name(&self) -> &'static str {
///         "force-baud"
///     }
///
///     fn before_upload(&self, _ctx: &UploadContext, env: &mut UploadEnvironment) -> Result<()> {
///         let mut flags = env.uploader_flags().to_vec();
///         flags.extend(["--baud".into(), "115200".into()]);
///         env.replace(UPLOADER_FLAGS_KEY, flags);
///         Ok(())
///     }
/// }
/// ```
pub trait PreUploadHook {
    /// Short hook name used in logs
    fn name(&self) -> &'static str;

    /// Shape the environment before the uploader runs
    fn before_upload(&self, ctx: &UploadContext, env: &mut UploadEnvironment) -> Result<()>;
}

// =============================================================================
// Unit Tests
// =============================================================================
