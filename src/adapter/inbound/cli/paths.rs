//! Path utilities for tosker.
//!
//! User configuration lives under `~/.tosker/`:
//! - `~/.tosker/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the tosker home directory (`~/.tosker/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tosker")
}

/// Returns the default config file path (`~/.tosker/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
