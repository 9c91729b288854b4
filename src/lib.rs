//! NVS-preserving upload hooks for ESP32 firmware projects
//!
//! Re-flashing an ESP32 with an erase flag (`--erase-all`, `--erase-flash`)
//! wipes the NVS partition, and with it the WiFi credentials the firmware
//! stored there. This crate intercepts the upload step and strips those
//! flags from the uploader's command line so credentials survive a
//! re-flash. It never reads or writes the device's flash layout itself.
//!
//! # Architecture
//!
//! The crate is organized around an explicit hook pipeline:
//!
//! 1. **Environment** ([`env`]): caller-owned build settings, including the
//!    `UPLOADERFLAGS` list, mutated under a single-writer contract
//! 2. **Hooks** ([`hook`], [`filter`]): the [`PreUploadHook`] seam and the
//!    [`UploadFlagFilter`] that removes NVS-erasing flags
//! 3. **Orchestrator** ([`uploader`]): registers hooks explicitly on the
//!    upload action, dispatches them in order, then spawns the flashing tool
//! 4. **Config** ([`config`]): optional `upload.toml` project file seeding
//!    the environment
//!
//! # Example
//!
//! ```ignore
//! use nvs_guard::{UploadAction, UploadContext, UploadEnvironment, UploadFlagFilter};
//!
//! let env = UploadEnvironment::with_uploader_flags([
//!     "flash", "--chip", "esp32", "--erase-all", "--baud", "921600",
//! ]);
//!
//! let mut action = UploadAction::new("espflash", env);
//! action.register_pre_hook(Box::new(UploadFlagFilter::new()));
//!
//! let ctx = UploadContext::new("upload")
//!     .with_image("target/firmware.bin")
//!     .with_port("/dev/ttyUSB0");
//!
//! // Runs the filter (dropping --erase-all), then spawns:
//! //   espflash flash --chip esp32 --baud 921600 --port /dev/ttyUSB0 target/firmware.bin
//! action.run(&ctx)?;
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod filter;
pub mod hook;
pub mod uploader;

pub use config::{DEFAULT_UPLOAD_TOOL, ProjectConfig};
pub use env::{UPLOADER_FLAGS_KEY, UploadEnvironment};
pub use error::{ConfigError, ConfigResult, Error, Result, UploadError, UploadResult};
pub use filter::{FORBIDDEN_ERASE_FLAGS, PRESERVE_NVS_MESSAGE, UploadFlagFilter};
pub use hook::{PreUploadHook, UploadContext};
pub use uploader::UploadAction;
