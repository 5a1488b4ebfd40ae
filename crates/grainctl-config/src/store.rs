//! Storage backends for the settings record and the preset bank.

use std::path::{Path, PathBuf};

use crate::paths::{ensure_dir, presets_path, settings_path, user_config_dir};
use crate::{ConfigError, PresetBank, SettingsData};

/// A place where settings and presets persist.
///
/// Loads return `Ok(None)` when nothing has been stored yet and an error
/// when stored data exists but cannot be read back.
pub trait SettingsStore {
    /// Reads the settings record.
    fn load_settings(&self) -> Result<Option<SettingsData>, ConfigError>;

    /// Writes the settings record.
    fn save_settings(&mut self, data: &SettingsData) -> Result<(), ConfigError>;

    /// Reads the preset bank.
    fn load_presets(&self) -> Result<Option<PresetBank>, ConfigError>;

    /// Writes the preset bank.
    fn save_presets(&mut self, bank: &PresetBank) -> Result<(), ConfigError>;
}

/// In-memory store, used by tests and simulations without `--store`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    settings: Option<SettingsData>,
    presets: Option<PresetBank>,
    settings_saves: usize,
    preset_saves: usize,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `data`.
    pub fn with_settings(data: SettingsData) -> Self {
        Self {
            settings: Some(data),
            ..Self::default()
        }
    }

    /// Adds a stored preset bank.
    pub fn with_presets(mut self, bank: PresetBank) -> Self {
        self.presets = Some(bank);
        self
    }

    /// Last settings record written, if any.
    pub fn settings(&self) -> Option<&SettingsData> {
        self.settings.as_ref()
    }

    /// Last preset bank written, if any.
    pub fn presets(&self) -> Option<&PresetBank> {
        self.presets.as_ref()
    }

    /// Number of settings writes.
    pub fn settings_saves(&self) -> usize {
        self.settings_saves
    }

    /// Number of preset bank writes.
    pub fn preset_saves(&self) -> usize {
        self.preset_saves
    }
}

impl SettingsStore for MemoryStore {
    fn load_settings(&self) -> Result<Option<SettingsData>, ConfigError> {
        Ok(self.settings)
    }

    fn save_settings(&mut self, data: &SettingsData) -> Result<(), ConfigError> {
        self.settings = Some(*data);
        self.settings_saves += 1;
        Ok(())
    }

    fn load_presets(&self) -> Result<Option<PresetBank>, ConfigError> {
        Ok(self.presets.clone())
    }

    fn save_presets(&mut self, bank: &PresetBank) -> Result<(), ConfigError> {
        self.presets = Some(bank.clone());
        self.preset_saves += 1;
        Ok(())
    }
}

/// TOML files in a directory.
///
/// ```text
/// <dir>/settings.toml   calibration + state
/// <dir>/presets.toml    preset bank
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A store in the user configuration directory.
    pub fn user() -> Self {
        Self::new(user_config_dir())
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Ok(Some(toml::from_str(&content)?))
    }

    fn write<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<(), ConfigError> {
        ensure_dir(&self.dir)?;
        let content = toml::to_string_pretty(value)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

impl SettingsStore for FileStore {
    fn load_settings(&self) -> Result<Option<SettingsData>, ConfigError> {
        Self::read(&settings_path(&self.dir))
    }

    fn save_settings(&mut self, data: &SettingsData) -> Result<(), ConfigError> {
        self.write(&settings_path(&self.dir), data)
    }

    fn load_presets(&self) -> Result<Option<PresetBank>, ConfigError> {
        Self::read(&presets_path(&self.dir))
    }

    fn save_presets(&mut self, bank: &PresetBank) -> Result<(), ConfigError> {
        self.write(&presets_path(&self.dir), bank)
    }
}

impl<T: SettingsStore + ?Sized> SettingsStore for Box<T> {
    fn load_settings(&self) -> Result<Option<SettingsData>, ConfigError> {
        (**self).load_settings()
    }

    fn save_settings(&mut self, data: &SettingsData) -> Result<(), ConfigError> {
        (**self).save_settings(data)
    }

    fn load_presets(&self) -> Result<Option<PresetBank>, ConfigError> {
        (**self).load_presets()
    }

    fn save_presets(&mut self, bank: &PresetBank) -> Result<(), ConfigError> {
        (**self).save_presets(bank)
    }
}
