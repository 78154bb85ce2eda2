//! Diagnostic log file setup
//!
//! The terminal belongs to the UI, so diagnostics only go to a file in the
//! config directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

pub const LOG_FILE_NAME: &str = "ytdlp-tui.log";

/// Start logging to `<dir>/ytdlp-tui.log`, returning the file path
///
/// Failing to create the file leaves logging disabled.
pub fn initialize(dir: &Path, level: LevelFilter) -> Option<PathBuf> {
    if let Err(err) = fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {:?}: {}", dir, err);
        return None;
    }

    let log_path = dir.join(LOG_FILE_NAME);
    match File::create(&log_path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, build_config(), file);
            log::info!("logging started at level {}", level);
            Some(log_path)
        }
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", log_path, err);
            None
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}
