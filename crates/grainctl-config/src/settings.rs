//! Persistent settings: calibration, quality and playback mode.
//!
//! [`Settings`] owns a [`SettingsStore`] and the in-memory copy of both
//! records. Missing or unreadable data never surfaces as an error: the
//! factory defaults are used and written back immediately.

use serde::{Deserialize, Serialize};

use grainctl_platform::CalibrationData;

use crate::{ConfigError, PresetBank, PresetLocation, SettingsStore};

/// Number of quality levels. The level encodes channel count (bit 0 set:
/// mono) and fidelity (bit 1 set: low fidelity).
pub const NUM_QUALITY_LEVELS: u8 = 4;

/// Engine algorithm.
///
/// Stored as its index; out-of-range indices wrap on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum PlaybackMode {
    /// Granular synthesis.
    #[default]
    Granular,
    /// Pitch-shifting time stretch.
    Stretch,
    /// Looping delay.
    LoopingDelay,
    /// Spectral processing.
    Spectral,
    /// Reverb.
    Oliverb,
    /// Resonator.
    Resonestor,
}

impl PlaybackMode {
    /// Number of modes.
    pub const COUNT: u8 = 6;

    /// All modes in index order.
    pub const ALL: [PlaybackMode; Self::COUNT as usize] = [
        PlaybackMode::Granular,
        PlaybackMode::Stretch,
        PlaybackMode::LoopingDelay,
        PlaybackMode::Spectral,
        PlaybackMode::Oliverb,
        PlaybackMode::Resonestor,
    ];

    /// Index of this mode.
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Mode at `index`, wrapping modulo [`COUNT`](Self::COUNT).
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % Self::COUNT) as usize]
    }

    /// Next mode, wrapping.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Previous mode, wrapping.
    pub const fn previous(self) -> Self {
        Self::from_index(self.index() + Self::COUNT - 1)
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            PlaybackMode::Granular => "granular",
            PlaybackMode::Stretch => "stretch",
            PlaybackMode::LoopingDelay => "looping_delay",
            PlaybackMode::Spectral => "spectral",
            PlaybackMode::Oliverb => "oliverb",
            PlaybackMode::Resonestor => "resonestor",
        }
    }
}

impl From<u8> for PlaybackMode {
    fn from(index: u8) -> Self {
        Self::from_index(index)
    }
}

impl From<PlaybackMode> for u8 {
    fn from(mode: PlaybackMode) -> Self {
        mode.index()
    }
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine state restored at power-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    /// Quality level, `0..NUM_QUALITY_LEVELS`.
    pub quality: u8,
    /// Engine algorithm.
    pub playback_mode: PlaybackMode,
}

impl State {
    /// Wraps the quality level into range.
    pub fn sanitize(&mut self) {
        self.quality %= NUM_QUALITY_LEVELS;
    }
}

/// The settings record as stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SettingsData {
    /// Analog input calibration.
    pub calibration: CalibrationData,
    /// Engine state.
    #[serde(default)]
    pub state: State,
}

/// Settings manager: the in-memory records plus the store they persist to.
#[derive(Debug)]
pub struct Settings<S: SettingsStore> {
    store: S,
    data: SettingsData,
    presets: PresetBank,
    freshly_baked: bool,
}

impl<S: SettingsStore> Settings<S> {
    /// Loads both records from `store`, falling back to defaults.
    ///
    /// Missing or corrupt settings are replaced by the factory defaults and
    /// written back; the result reports [`freshly_baked`](Self::freshly_baked).
    /// A missing, corrupt or incompatible preset bank is replaced by an empty
    /// one and written back.
    pub fn init(store: S) -> Self {
        let mut settings = Self {
            store,
            data: SettingsData::default(),
            presets: PresetBank::new(),
            freshly_baked: false,
        };

        match settings.store.load_settings() {
            Ok(Some(mut data)) => {
                data.state.sanitize();
                settings.data = data;
            }
            Ok(None) => {
                tracing::info!("no stored settings, using factory calibration");
                settings.bake();
            }
            Err(e) => {
                tracing::warn!("stored settings unreadable ({e}), using factory calibration");
                settings.bake();
            }
        }

        match settings.store.load_presets() {
            Ok(Some(bank)) if bank.is_compatible() => settings.presets = bank,
            Ok(Some(bank)) => {
                tracing::warn!(
                    "preset bank v{} {}x{} incompatible, starting empty",
                    bank.version,
                    bank.num_banks,
                    bank.bank_size
                );
                settings.reset_presets();
            }
            Ok(None) => {
                tracing::info!("no stored presets, starting with an empty bank");
                settings.reset_presets();
            }
            Err(e) => {
                tracing::warn!("stored presets unreadable ({e}), starting empty");
                settings.reset_presets();
            }
        }

        settings
    }

    fn bake(&mut self) {
        self.data = SettingsData::default();
        self.freshly_baked = true;
        if let Err(e) = self.save() {
            tracing::warn!("failed to persist default settings: {e}");
        }
    }

    fn reset_presets(&mut self) {
        self.presets = PresetBank::new();
        if let Err(e) = self.save_presets() {
            tracing::warn!("failed to persist empty preset bank: {e}");
        }
    }

    /// Persists the settings record.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.store.save_settings(&self.data)?;
        tracing::info!(
            "settings saved (quality {}, mode {})",
            self.data.state.quality,
            self.data.state.playback_mode
        );
        Ok(())
    }

    /// Persists the preset bank.
    pub fn save_presets(&mut self) -> Result<(), ConfigError> {
        self.store.save_presets(&self.presets)?;
        tracing::info!("preset bank saved");
        Ok(())
    }

    /// Restores factory settings and persists them.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.data = SettingsData::default();
        self.save()
    }

    /// True when no valid settings were found at init.
    #[inline]
    pub fn freshly_baked(&self) -> bool {
        self.freshly_baked
    }

    /// The settings record.
    #[inline]
    pub fn data(&self) -> &SettingsData {
        &self.data
    }

    /// Calibration record.
    #[inline]
    pub fn calibration(&self) -> &CalibrationData {
        &self.data.calibration
    }

    /// Mutable calibration record. Call [`save`](Self::save) to persist.
    #[inline]
    pub fn calibration_mut(&mut self) -> &mut CalibrationData {
        &mut self.data.calibration
    }

    /// Persistent engine state.
    #[inline]
    pub fn state(&self) -> &State {
        &self.data.state
    }

    /// Mutable engine state. Call [`save`](Self::save) to persist.
    #[inline]
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.data.state
    }

    /// The preset bank.
    #[inline]
    pub fn presets(&self) -> &PresetBank {
        &self.presets
    }

    /// Mutable preset bank. Call [`save_presets`](Self::save_presets) to persist.
    #[inline]
    pub fn presets_mut(&mut self) -> &mut PresetBank {
        &mut self.presets
    }

    /// Moves `location` to the next slot of this bank's geometry.
    pub fn increment_location(&self, location: &mut PresetLocation) {
        location.advance(self.presets.num_banks, self.presets.bank_size);
    }

    /// The underlying store.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the manager and returns its store.
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_playback_mode_wraps() {
        assert_eq!(PlaybackMode::Resonestor.next(), PlaybackMode::Granular);
        assert_eq!(PlaybackMode::Granular.previous(), PlaybackMode::Resonestor);
        assert_eq!(PlaybackMode::from_index(7), PlaybackMode::Stretch);
        assert_eq!(u8::from(PlaybackMode::Spectral), 3);
    }

    #[test]
    fn test_default_settings() {
        let data = SettingsData::default();
        assert_eq!(data.calibration.pitch_offset, 66.67);
        assert_eq!(data.calibration.pitch_scale, -84.26);
        assert!(data.calibration.offset.iter().all(|&o| o == 0.505));
        assert_eq!(data.state.quality, 0);
        assert_eq!(data.state.playback_mode, PlaybackMode::Granular);
    }

    #[test]
    fn test_init_empty_store_bakes_and_persists() {
        let settings = Settings::init(MemoryStore::new());
        assert!(settings.freshly_baked());
        assert_eq!(settings.store().settings_saves(), 1);
        assert_eq!(settings.store().preset_saves(), 1);
        assert!(settings.presets().is_compatible());
    }

    #[test]
    fn test_init_sanitizes_quality() {
        let mut data = SettingsData::default();
        data.state.quality = 6;
        let settings = Settings::init(MemoryStore::with_settings(data));
        assert!(!settings.freshly_baked());
        assert_eq!(settings.state().quality, 2);
        assert_eq!(settings.store().settings_saves(), 0);
    }

    #[test]
    fn test_init_replaces_incompatible_bank() {
        let mut bank = PresetBank::new();
        bank.num_banks = 5;
        let store = MemoryStore::new().with_presets(bank);
        let settings = Settings::init(store);
        assert_eq!(settings.presets().num_banks, 3);
        assert_eq!(settings.store().preset_saves(), 1);
    }

    #[test]
    fn test_keeps_compatible_bank() {
        let mut bank = PresetBank::new();
        let loc = PresetLocation::new(1, 2);
        bank.preset_mut(loc).unwrap().texture = 0.3;
        let settings = Settings::init(MemoryStore::new().with_presets(bank));
        assert_eq!(settings.presets().preset(loc).unwrap().texture, 0.3);
    }

    #[test]
    fn test_increment_location_uses_geometry() {
        let settings = Settings::init(MemoryStore::new());
        let mut loc = PresetLocation::new(2, 3);
        settings.increment_location(&mut loc);
        assert_eq!(loc, PresetLocation::new(0, 0));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut settings = Settings::init(MemoryStore::new());
        settings.state_mut().quality = 3;
        settings.calibration_mut().pitch_scale = -90.0;
        settings.reset().unwrap();
        assert_eq!(settings.data(), &SettingsData::default());
    }
}
