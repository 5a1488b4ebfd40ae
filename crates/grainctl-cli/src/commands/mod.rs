//! CLI command implementations.

pub mod common;
pub mod factory;
pub mod presets;
pub mod settings;
pub mod simulate;
