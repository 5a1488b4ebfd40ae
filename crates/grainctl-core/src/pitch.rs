//! Quantizing pitch lookup for the transpose potentiometer.
//!
//! The pitch pot spans [`PITCH_RANGE_SEMITONES`] either side of zero. Each
//! semitone gets a small flat zone so the knob "clicks" onto whole intervals,
//! while the curve between semitones stays continuous and strictly
//! non-decreasing:
//!
//! ```text
//! n      = -R + 2R * x          (raw semitones)
//! q      = round(n)
//! pitch  = q + 4 * (n - q)^3    (cubic flattening around q)
//! ```

use crate::math::interpolate;

/// Number of table segments. The table holds `PITCH_TABLE_SIZE + 1` entries.
pub const PITCH_TABLE_SIZE: usize = 1024;

/// Transposition range either side of zero, in semitones.
pub const PITCH_RANGE_SEMITONES: f32 = 48.0;

/// Monotonic normalized-to-semitone lookup table.
#[derive(Debug, Clone)]
pub struct PitchTable {
    table: [f32; PITCH_TABLE_SIZE + 1],
}

impl PitchTable {
    /// Builds the table. Done once at startup.
    pub fn new() -> Self {
        let mut table = [0.0; PITCH_TABLE_SIZE + 1];
        for (i, entry) in table.iter_mut().enumerate() {
            let x = i as f32 / PITCH_TABLE_SIZE as f32;
            let raw = -PITCH_RANGE_SEMITONES + 2.0 * PITCH_RANGE_SEMITONES * x;
            let nearest = libm::roundf(raw);
            let offset = raw - nearest;
            *entry = nearest + 4.0 * offset * offset * offset;
        }
        Self { table }
    }

    /// Semitone value for a normalized pot reading in `[0, 1]`.
    #[inline]
    pub fn lookup(&self, normalized: f32) -> f32 {
        interpolate(&self.table, normalized)
    }

    /// The raw table entries.
    pub fn as_slice(&self) -> &[f32] {
        &self.table
    }
}

impl Default for PitchTable {
    fn default() -> Self {
        Self::new()
    }
}
