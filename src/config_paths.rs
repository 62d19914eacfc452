//! Where notegrid keeps its files
//!
//! `$XDG_CONFIG_HOME/notegrid/` or `~/.config/notegrid/` on Unix and macOS,
//! `%APPDATA%\notegrid\` on Windows.

use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "notegrid";

/// Prefix of the daily-rotated log files
pub const LOG_FILE_PREFIX: &str = "notegrid.log";

pub fn config_dir() -> Option<PathBuf> {
    platform_config_root().map(|root| root.join(APP_DIR))
}

#[cfg(target_os = "windows")]
fn platform_config_root() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(target_os = "windows"))]
fn platform_config_root() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
}

fn config_entry(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(name))
}

/// User theme overrides
pub fn themes_dir() -> Option<PathBuf> {
    config_entry("themes")
}

pub fn config_file() -> Option<PathBuf> {
    config_entry("config.yaml")
}

pub fn logs_dir() -> Option<PathBuf> {
    config_entry("logs")
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "no config directory available".to_string())?;
    fs::create_dir_all(&logs)
        .map_err(|e| format!("failed to create {}: {}", logs.display(), e))?;
    Ok(logs)
}
