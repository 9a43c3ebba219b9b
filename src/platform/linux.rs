// eztag platform paths for Linux
// Config: ~/.config/eztag
// Data:   ~/.local/share/eztag

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Uses `$XDG_CONFIG_HOME/eztag` if set, otherwise `~/.config/eztag`.
pub fn get_config_dir() -> PathBuf {
    match env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("eztag"),
        _ => home_dir().join(".config").join("eztag"),
    }
}

/// Uses `$XDG_DATA_HOME/eztag` if set, otherwise `~/.local/share/eztag`.
pub fn get_data_dir() -> PathBuf {
    match env::var("XDG_DATA_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join("eztag"),
        _ => home_dir().join(".local").join("share").join("eztag"),
    }
}
