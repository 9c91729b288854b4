//! Upload wrapper for ESP32 firmware projects.
//!
//! This binary wraps the device-flashing tool and applies the registered
//! pre-upload hooks first, so that NVS-erasing flags never reach the tool
//! and stored WiFi credentials survive a re-flash.
//!
//! # Overview
//!
//! - Loads `upload.toml` (or `--config <path>`) for the tool and flag list
//! - Registers the NVS-preserving flag filter unless the project opts out
//! - Runs the hooks, then spawns the tool with the filtered flags
//!
//! # Usage
//!
//! ```ignore
//! nvs-guard upload --image target/firmware.bin --port /dev/ttyUSB0
//! nvs-guard show --config boards/wt32.toml
//! nvs-guard upload --dry-run
//! ```
//!
//! # Notes
//!
//! - If no command is supplied, `upload` is assumed.
//! - `show` prints the effective command after hooks without spawning it.
//! - A missing default `upload.toml` falls back to `espflash` with no
//!   flags; a missing `--config` path is an error.
//! - `RUST_LOG=debug` shows which hooks ran and what they removed.

use std::env;
use std::error::Error;
use std::path::PathBuf;

use nvs_guard::{ProjectConfig, UploadAction, UploadContext, UploadFlagFilter};

const DEFAULT_CONFIG_PATH: &str = "upload.toml";

/// Operational mode for the invocation.
#[derive(Clone, Copy)]
enum Mode {
    Upload,
    Show,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("nvs-guard: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    if matches!(args.first().map(String::as_str), Some("-h" | "--help" | "help")) {
        print_usage();
        return Ok(());
    }

    let mut mode = Mode::Upload;
    let mut config_path: Option<PathBuf> = None;
    let mut image: Option<PathBuf> = None;
    let mut port: Option<String> = None;
    let mut dry_run = false;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "upload" => mode = Mode::Upload,
            "show" => mode = Mode::Show,
            "--config" => {
                let path = iter.next().ok_or("--config requires a path")?;
                config_path = Some(PathBuf::from(path));
            }
            "--image" => {
                let path = iter.next().ok_or("--image requires a path")?;
                image = Some(PathBuf::from(path));
            }
            "--port" => {
                let dev = iter.next().ok_or("--port requires a device")?;
                port = Some(dev);
            }
            "--dry-run" => dry_run = true,
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let config = load_config(config_path)?;

    let mut ctx = UploadContext::new("upload");
    if let Some(image) = image {
        ctx = ctx.with_image(image);
    }
    if let Some(port) = port {
        ctx = ctx.with_port(port);
    }

    let preserve_nvs = config.preserve_nvs;
    let tool = config.tool.clone();
    let mut action = UploadAction::new(tool, config.into_environment())
        .with_dry_run(dry_run || matches!(mode, Mode::Show));

    if preserve_nvs {
        action.register_pre_hook(Box::new(UploadFlagFilter::new()));
    } else {
        log::debug!("preserve_nvs disabled by project file, filter not registered");
    }

    action.run(&ctx)?;
    Ok(())
}

/// Load the project file, tolerating only the default path being absent.
fn load_config(config_path: Option<PathBuf>) -> Result<ProjectConfig, Box<dyn Error>> {
    match config_path {
        Some(path) => Ok(ProjectConfig::load(&path)?),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.is_file() {
                Ok(ProjectConfig::load(&default)?)
            } else {
                Ok(ProjectConfig::default())
            }
        }
    }
}

fn print_usage() {
    eprintln!(
        "Usage:\n  nvs-guard upload [--config <path>] [--image <path>] [--port <dev>] [--dry-run]\n  nvs-guard show [--config <path>] [--image <path>] [--port <dev>]\n\nCommands:\n  upload  run pre-upload hooks, then spawn the flashing tool (default)\n  show    print the effective command after hooks without spawning\n\nNotes:\n  - Tool and flags come from upload.toml ([upload] table); missing file\n    means `espflash` with no flags.\n  - Set `preserve_nvs = false` in the project file to skip the filter.\n",
    );
}
