//! Settings, calibration and preset persistence for grainctl.
//!
//! # Features
//!
//! - **Settings**: Analog calibration plus the engine state restored at
//!   power-up, with factory defaults when nothing valid is stored
//! - **Presets**: A fixed 3 x 4 bank of engine snapshots with a wrapping cursor
//! - **Stores**: In-memory and TOML-file backends behind [`SettingsStore`]
//! - **Paths**: Platform-specific configuration directory
//!
//! # Example
//!
//! ```rust
//! use grainctl_config::{MemoryStore, PresetLocation, Settings};
//!
//! let mut settings = Settings::init(MemoryStore::new());
//! assert!(settings.freshly_baked());
//!
//! let location = PresetLocation::new(0, 2);
//! settings.presets_mut().preset_mut(location).unwrap().texture = 0.75;
//! settings.save_presets().unwrap();
//! assert_eq!(settings.presets().preset(location).unwrap().texture, 0.75);
//! ```

mod error;
mod preset;
mod settings;
mod store;

/// Platform-specific paths for stored settings.
pub mod paths;

pub use error::ConfigError;
pub use preset::{
    CURRENT_PRESET_BANK_VERSION, CURRENT_PRESET_VERSION, PRESET_BANK_SIZE, PRESET_NUM_BANKS,
    Preset, PresetBank, PresetLocation,
};
pub use settings::{NUM_QUALITY_LEVELS, PlaybackMode, Settings, SettingsData, State};
pub use store::{FileStore, MemoryStore, SettingsStore};

/// Re-export of the calibration record persisted inside [`SettingsData`].
pub use grainctl_platform::CalibrationData;
