// eztag platform abstraction
// Resolves where settings and the token database live on Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Overrides the settings file path.
pub const CONFIG_ENV: &str = "EZTAG_CONFIG";

/// Overrides the directory holding `eztag.db`.
pub const DATA_DIR_ENV: &str = "EZTAG_DATA_DIR";

/// Returns the platform-specific configuration directory for eztag.
///
/// - **Linux**: `~/.config/eztag` (or `$XDG_CONFIG_HOME/eztag`)
/// - **macOS**: `~/Library/Application Support/eztag`
/// - **Windows**: `%APPDATA%/eztag`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory for eztag.
///
/// - **Linux**: `~/.local/share/eztag` (or `$XDG_DATA_HOME/eztag`)
/// - **macOS**: `~/Library/Application Support/eztag`
/// - **Windows**: `%APPDATA%/eztag`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Settings file: `$EZTAG_CONFIG`, else `settings.json` in the config directory.
pub fn settings_path() -> PathBuf {
    match env::var(CONFIG_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_config_dir().join("settings.json"),
    }
}

/// Token database: `$EZTAG_DATA_DIR/eztag.db`, else `eztag.db` in the data directory.
pub fn database_path() -> PathBuf {
    match env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("eztag.db"),
        _ => get_data_dir().join("eztag.db"),
    }
}
