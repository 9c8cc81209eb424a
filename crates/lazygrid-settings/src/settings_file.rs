//! Locations of lazygrid files
//!
//! Settings live under the platform config directory, exports and logs
//! under the data directory. `LAZYGRID_HOME` replaces both with a single
//! directory.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "lazygrid";

/// Environment variable overriding every lazygrid directory
pub const HOME_ENV: &str = "LAZYGRID_HOME";

fn resolve(home: Option<OsString>, base: Option<PathBuf>, what: &str) -> Result<PathBuf> {
    if let Some(home) = home.filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    base.map(|p| p.join(APP_DIR))
        .with_context(|| format!("Could not determine {what} directory"))
}

pub fn config_dir() -> Result<PathBuf> {
    resolve(std::env::var_os(HOME_ENV), dirs::config_dir(), "config")
}

pub fn data_dir() -> Result<PathBuf> {
    resolve(std::env::var_os(HOME_ENV), dirs::data_dir(), "data")
}

pub fn settings_file() -> Result<PathBuf> {
    config_dir().map(|p| p.join("settings.json"))
}

/// Default directory for exported artifacts
pub fn exports_dir() -> Result<PathBuf> {
    data_dir().map(|p| p.join("exports"))
}

/// Rolling JSON log files
pub fn logs_dir() -> Result<PathBuf> {
    data_dir().map(|p| p.join("logs"))
}
