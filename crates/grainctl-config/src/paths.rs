//! Platform-specific storage paths.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/grainctl/` (Linux), `~/Library/Application Support/grainctl/` (macOS), `%APPDATA%\grainctl\` (Windows)
//!
//! The directory holds two files, [`SETTINGS_FILE`] and [`PRESETS_FILE`].

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "grainctl";

/// Calibration and persistent state.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Preset bank.
pub const PRESETS_FILE: &str = "presets.toml";

/// Returns the user-specific configuration directory.
///
/// # Platform Paths
///
/// - Linux: `~/.config/grainctl/`
/// - macOS: `~/Library/Application Support/grainctl/`
/// - Windows: `%APPDATA%\grainctl\`
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Settings file inside `dir`.
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

/// Preset bank file inside `dir`.
pub fn presets_path(dir: &Path) -> PathBuf {
    dir.join(PRESETS_FILE)
}

/// Creates `dir` and its parents if needed.
pub fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }
    Ok(())
}
