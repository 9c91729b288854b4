//! Project configuration
//!
//! A project pins its upload setup in a small TOML file, by default
//! `upload.toml` next to the firmware project:
//!
//! ```toml
//! [upload]
//! tool = "espflash"
//! flags = ["--chip", "esp32", "--baud", "921600"]
//! preserve_nvs = true
//! ```
//!
//! Every field is optional. A missing `[upload]` table yields the defaults:
//! `espflash`, no flags, NVS preservation on. Fields that are present with
//! the wrong TOML type are reported as [`ConfigError::WrongType`] rather
//! than silently ignored.

use std::fs;
use std::path::Path;

use crate::env::UploadEnvironment;
use crate::error::{ConfigError, ConfigResult};

/// Uploader tool used when the project file does not name one
pub const DEFAULT_UPLOAD_TOOL: &str = "espflash";

// =============================================================================
// Project Config
// =============================================================================

/// Upload settings loaded from the project file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Flashing tool to invoke
    pub tool: String,
    /// Initial uploader flag list
    pub flags: Vec<String>,
    /// Whether to install the NVS-preserving flag filter
    pub preserve_nvs: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_UPLOAD_TOOL.to_string(),
            flags: Vec::new(),
            preserve_nvs: true,
        }
    }
}

impl ProjectConfig {
    /// Load the project file at `path`
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse project file contents
    ///
    /// `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> ConfigResult<Self> {
        let value: toml::Value = text.parse().map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(upload) = value.get("upload") else {
            return Ok(Self::default());
        };

        let tool = match upload.get("tool") {
            None => DEFAULT_UPLOAD_TOOL.to_string(),
            Some(toml::Value::String(tool)) => tool.clone(),
            Some(_) => {
                return Err(ConfigError::WrongType {
                    field: "upload.tool",
                    expected: "a string",
                });
            }
        };

        let flags = parse_flag_list(upload.get("flags"))?;

        let preserve_nvs = match upload.get("preserve_nvs") {
            None => true,
            Some(toml::Value::Boolean(preserve)) => *preserve,
            Some(_) => {
                return Err(ConfigError::WrongType {
                    field: "upload.preserve_nvs",
                    expected: "a boolean",
                });
            }
        };

        Ok(Self {
            tool,
            flags,
            preserve_nvs,
        })
    }

    /// Seed an upload environment from these settings
    #[must_use]
    pub fn into_environment(self) -> UploadEnvironment {
        UploadEnvironment::with_uploader_flags(self.flags)
    }
}

/// Coerce the `upload.flags` value into a flag list
///
/// Accepts an array of strings or a single string (the same coercion the
/// build system applies to list-valued settings).
fn parse_flag_list(value: Option<&toml::Value>) -> ConfigResult<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(toml::Value::String(single)) => Ok(vec![single.clone()]),
        Some(toml::Value::Array(entries)) => {
            let mut flags = Vec::with_capacity(entries.len());
            for entry in entries {
                match entry.as_str() {
                    Some(flag) => flags.push(flag.to_string()),
                    None => {
                        return Err(ConfigError::WrongType {
                            field: "upload.flags",
                            expected: "an array of strings",
                        });
                    }
                }
            }
            Ok(flags)
        }
        Some(_) => Err(ConfigError::WrongType {
            field: "upload.flags",
            expected: "an array of strings",
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
