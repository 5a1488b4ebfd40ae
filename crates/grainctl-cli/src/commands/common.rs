//! Shared helpers for CLI commands.

use clap::Args;
use grainctl_config::{FileStore, MemoryStore, Settings, SettingsStore};
use std::path::PathBuf;

/// Boxed store so every command can pick its backend at runtime.
pub type DynStore = Box<dyn SettingsStore>;

/// Where settings and presets are read from and written to.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Settings directory (defaults to the user config directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub store: Option<PathBuf>,
}

impl StoreArgs {
    /// Opens the selected directory, or the user config directory.
    pub fn open(&self) -> DynStore {
        let store = match &self.store {
            Some(dir) => FileStore::new(dir),
            None => FileStore::user(),
        };
        tracing::debug!("using store at {}", store.dir().display());
        Box::new(store)
    }

    /// Opens the selected directory, or a throwaway in-memory store.
    pub fn open_or_memory(&self) -> DynStore {
        match &self.store {
            Some(_) => self.open(),
            None => Box::new(MemoryStore::new()),
        }
    }

    /// Loads settings from the user's choice of store.
    pub fn settings(&self) -> Settings<DynStore> {
        Settings::init(self.open())
    }
}

/// Parses a byte given in decimal or `0x` hexadecimal.
pub fn parse_byte(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    parsed.map_err(|e| format!("invalid byte '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_byte("9"), Ok(9));
        assert_eq!(parse_byte("0x61"), Ok(0x61));
        assert_eq!(parse_byte("0XFF"), Ok(255));
        assert!(parse_byte("256").is_err());
        assert!(parse_byte("0xZZ").is_err());
    }
}
