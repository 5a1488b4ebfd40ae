//! Preset records and the fixed-geometry preset bank.

use serde::{Deserialize, Serialize};

use grainctl_core::Parameters;

use crate::{ConfigError, PlaybackMode};

/// Number of banks (white, red, pink).
pub const PRESET_NUM_BANKS: u8 = 3;

/// Slots per bank.
pub const PRESET_BANK_SIZE: u8 = 4;

/// Version stamped on every written preset. Version 0 marks an empty slot.
pub const CURRENT_PRESET_VERSION: u32 = 1;

/// Version of the bank layout.
pub const CURRENT_PRESET_BANK_VERSION: u32 = 1;

/// A bank/slot cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PresetLocation {
    /// Bank index.
    pub bank: u8,
    /// Slot index within the bank.
    pub slot: u8,
}

impl PresetLocation {
    /// Creates a location.
    pub const fn new(bank: u8, slot: u8) -> Self {
        Self { bank, slot }
    }

    /// Moves to the next slot, rolling over into the next bank and wrapping
    /// after the last bank.
    ///
    /// # Example
    ///
    /// ```rust
    /// use grainctl_config::PresetLocation;
    ///
    /// let mut loc = PresetLocation::new(0, 3);
    /// loc.advance(3, 4);
    /// assert_eq!(loc, PresetLocation::new(1, 0));
    /// ```
    pub fn advance(&mut self, num_banks: u8, bank_size: u8) {
        self.slot = (self.slot + 1) % bank_size;
        self.bank = (self.bank + u8::from(self.slot == 0)) % num_banks;
    }
}

impl std::fmt::Display for PresetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bank {} slot {}", self.bank, self.slot)
    }
}

/// A stored snapshot of the engine: algorithm, quality and every knob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Format version; 0 means the slot was never written.
    pub version: u32,
    /// Engine algorithm.
    pub playback_mode: PlaybackMode,
    /// Two-channel processing.
    pub stereo: bool,
    /// Reduced sample rate and bit depth.
    pub low_fidelity: bool,
    /// Grain/buffer read position.
    pub position: f32,
    /// Grain size.
    pub size: f32,
    /// Transposition in semitones.
    pub pitch: f32,
    /// Grain density.
    pub density: f32,
    /// Grain envelope texture.
    pub texture: f32,
    /// Dry/wet balance.
    pub dry_wet: f32,
    /// Stereo spread.
    pub stereo_spread: f32,
    /// Feedback amount.
    pub feedback: f32,
    /// Reverb amount.
    pub reverb: f32,
}

impl Preset {
    /// A never-written slot.
    pub const EMPTY: Preset = Preset {
        version: 0,
        playback_mode: PlaybackMode::Granular,
        stereo: false,
        low_fidelity: false,
        position: 0.0,
        size: 0.0,
        pitch: 0.0,
        density: 0.0,
        texture: 0.0,
        dry_wet: 0.0,
        stereo_spread: 0.0,
        feedback: 0.0,
        reverb: 0.0,
    };

    /// Captures the values the engine is currently using.
    pub fn capture(params: &Parameters, playback_mode: PlaybackMode, quality: u8) -> Self {
        Self {
            version: CURRENT_PRESET_VERSION,
            playback_mode,
            stereo: quality & 1 == 0,
            low_fidelity: quality & 2 != 0,
            position: params.position.value(),
            size: params.size.value(),
            pitch: params.pitch.value(),
            density: params.density.value(),
            texture: params.texture.value(),
            dry_wet: params.dry_wet.value(),
            stereo_spread: params.stereo_spread.value(),
            feedback: params.feedback.value(),
            reverb: params.reverb.value(),
        }
    }

    /// True when the slot was never written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.version < CURRENT_PRESET_VERSION
    }

    /// Quality level encoded by `stereo` and `low_fidelity`.
    pub fn quality(&self) -> u8 {
        u8::from(!self.stereo) | (u8::from(self.low_fidelity) << 1)
    }

    /// Loads every knob value into `params`. Each control then ignores its
    /// knob until the knob is moved onto the loaded value.
    pub fn apply_to(&self, params: &mut Parameters) {
        params.position.load(self.position);
        params.size.load(self.size);
        params.pitch.load(self.pitch);
        params.density.load(self.density);
        params.texture.load(self.texture);
        params.dry_wet.load(self.dry_wet);
        params.stereo_spread.load(self.stereo_spread);
        params.feedback.load(self.feedback);
        params.reverb.load(self.reverb);
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// All preset slots, stored flat in bank-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetBank {
    /// Layout version.
    pub version: u32,
    /// Number of banks.
    pub num_banks: u8,
    /// Slots per bank.
    pub bank_size: u8,
    /// `num_banks * bank_size` presets.
    pub presets: Vec<Preset>,
}

impl PresetBank {
    /// An empty bank with the current layout.
    pub fn new() -> Self {
        Self {
            version: CURRENT_PRESET_BANK_VERSION,
            num_banks: PRESET_NUM_BANKS,
            bank_size: PRESET_BANK_SIZE,
            presets: vec![Preset::EMPTY; usize::from(PRESET_NUM_BANKS * PRESET_BANK_SIZE)],
        }
    }

    /// True when version and geometry match the current layout.
    pub fn is_compatible(&self) -> bool {
        self.version == CURRENT_PRESET_BANK_VERSION
            && self.num_banks == PRESET_NUM_BANKS
            && self.bank_size == PRESET_BANK_SIZE
            && self.presets.len() == usize::from(PRESET_NUM_BANKS * PRESET_BANK_SIZE)
    }

    fn index(&self, location: PresetLocation) -> Result<usize, ConfigError> {
        if location.bank >= self.num_banks || location.slot >= self.bank_size {
            return Err(ConfigError::NoSuchPreset(location));
        }
        let index =
            usize::from(location.bank) * usize::from(self.bank_size) + usize::from(location.slot);
        if index >= self.presets.len() {
            return Err(ConfigError::NoSuchPreset(location));
        }
        Ok(index)
    }

    /// The preset at `location`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSuchPreset`] outside the geometry,
    /// [`ConfigError::EmptySlot`] for a never-written slot.
    pub fn preset(&self, location: PresetLocation) -> Result<&Preset, ConfigError> {
        let preset = &self.presets[self.index(location)?];
        if preset.is_empty() {
            return Err(ConfigError::EmptySlot(location));
        }
        Ok(preset)
    }

    /// Mutable access to the slot at `location`, stamped with the current
    /// version so it counts as written.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSuchPreset`] outside the geometry.
    pub fn preset_mut(&mut self, location: PresetLocation) -> Result<&mut Preset, ConfigError> {
        let index = self.index(location)?;
        let preset = &mut self.presets[index];
        if preset.is_empty() {
            preset.version = CURRENT_PRESET_VERSION;
        }
        Ok(preset)
    }

    /// Iterates `(location, preset)` over every slot, written or not.
    pub fn iter(&self) -> impl Iterator<Item = (PresetLocation, &Preset)> {
        let bank_size = self.bank_size.max(1);
        self.presets.iter().enumerate().map(move |(i, preset)| {
            let location = PresetLocation::new(
                (i / usize::from(bank_size)) as u8,
                (i % usize::from(bank_size)) as u8,
            );
            (location, preset)
        })
    }

    /// Number of written slots.
    pub fn written(&self) -> usize {
        self.presets.iter().filter(|p| !p.is_empty()).count()
    }
}

impl Default for PresetBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_wraps_slot_then_bank() {
        let mut loc = PresetLocation::default();
        let mut visited = Vec::new();
        for _ in 0..13 {
            visited.push(loc);
            loc.advance(PRESET_NUM_BANKS, PRESET_BANK_SIZE);
        }
        assert_eq!(visited[3], PresetLocation::new(0, 3));
        assert_eq!(visited[4], PresetLocation::new(1, 0));
        assert_eq!(visited[11], PresetLocation::new(2, 3));
        assert_eq!(visited[12], PresetLocation::new(0, 0));
    }

    #[test]
    fn test_empty_bank() {
        let bank = PresetBank::new();
        assert!(bank.is_compatible());
        assert_eq!(bank.presets.len(), 12);
        assert_eq!(bank.written(), 0);
        assert!(matches!(
            bank.preset(PresetLocation::new(0, 0)),
            Err(ConfigError::EmptySlot(_))
        ));
    }

    #[test]
    fn test_out_of_range_location() {
        let mut bank = PresetBank::new();
        assert!(matches!(
            bank.preset(PresetLocation::new(3, 0)),
            Err(ConfigError::NoSuchPreset(_))
        ));
        assert!(matches!(
            bank.preset_mut(PresetLocation::new(0, 4)),
            Err(ConfigError::NoSuchPreset(_))
        ));
    }

    #[test]
    fn test_preset_mut_stamps_version() {
        let mut bank = PresetBank::new();
        let loc = PresetLocation::new(2, 1);
        bank.preset_mut(loc).unwrap().feedback = 0.4;
        let preset = bank.preset(loc).unwrap();
        assert_eq!(preset.version, CURRENT_PRESET_VERSION);
        assert_eq!(preset.feedback, 0.4);
        assert_eq!(bank.written(), 1);
    }

    #[test]
    fn test_incompatible_geometry() {
        let mut bank = PresetBank::new();
        bank.presets.pop();
        assert!(!bank.is_compatible());
        let mut bank = PresetBank::new();
        bank.version = 2;
        assert!(!bank.is_compatible());
    }

    #[test]
    fn test_quality_encoding() {
        for quality in 0..4 {
            let preset = Preset::capture(&Parameters::new(), PlaybackMode::Spectral, quality);
            assert_eq!(preset.quality(), quality);
        }
        let hifi_stereo = Preset::capture(&Parameters::new(), PlaybackMode::Granular, 0);
        assert!(hifi_stereo.stereo);
        assert!(!hifi_stereo.low_fidelity);
    }

    #[test]
    fn test_apply_then_capture() {
        let mut params = Parameters::new();
        params.texture.update(0.9);
        let preset = Preset {
            version: CURRENT_PRESET_VERSION,
            texture: 0.2,
            reverb: 0.7,
            ..Preset::EMPTY
        };
        preset.apply_to(&mut params);
        assert_eq!(params.texture.value(), 0.2);
        assert_eq!(params.texture.live(), 0.9);
        let captured = Preset::capture(&params, PlaybackMode::Granular, 0);
        assert_eq!(captured.texture, 0.2);
        assert_eq!(captured.reverb, 0.7);
    }

    #[test]
    fn test_iter_locations() {
        let bank = PresetBank::new();
        let locations: Vec<_> = bank.iter().map(|(loc, _)| loc).collect();
        assert_eq!(locations[5], PresetLocation::new(1, 1));
        assert_eq!(locations.len(), 12);
    }

    #[test]
    fn test_bank_toml_roundtrip_keeps_written_slot() {
        let mut bank = PresetBank::new();
        bank.preset_mut(PresetLocation::new(1, 3)).unwrap().playback_mode = PlaybackMode::Oliverb;
        let text = toml::to_string_pretty(&bank).unwrap();
        let parsed: PresetBank = toml::from_str(&text).unwrap();
        assert!(parsed.is_compatible());
        assert_eq!(
            parsed.preset(PresetLocation::new(1, 3)).unwrap().playback_mode,
            PlaybackMode::Oliverb
        );
    }
}
