//! Range and lookup helpers for normalized control values.

/// Clamps `value` to `[min, max]`.
///
/// Unlike [`f32::clamp`], a NaN input maps to `min` instead of propagating.
#[inline]
pub fn saturate(value: f32, min: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value >= min {
        value
    } else {
        min
    }
}

/// Gently expands the middle of the range to compensate for pots that do not
/// quite reach their physical extremes.
///
/// `v' = clamp(v * 1.05 - 0.025, 0, 1)`
///
/// # Example
///
/// ```rust
/// use grainctl_core::expand_range;
///
/// assert_eq!(expand_range(0.01), 0.0);
/// assert_eq!(expand_range(0.99), 1.0);
/// assert!((expand_range(0.5) - 0.5).abs() < 1e-6);
/// ```
#[inline]
pub fn expand_range(value: f32) -> f32 {
    saturate(value * 1.05 - 0.025, 0.0, 1.0)
}

/// Linearly interpolates a lookup table at a normalized position.
///
/// `position` in `[0, 1]` spans the table from its first to its last entry.
/// Positions outside the range are clamped. Tables shorter than two entries
/// return their only entry (or `0.0` when empty).
#[inline]
pub fn interpolate(table: &[f32], position: f32) -> f32 {
    match table.len() {
        0 => 0.0,
        1 => table[0],
        len => {
            let scaled = saturate(position, 0.0, 1.0) * (len - 1) as f32;
            let integral = (scaled as usize).min(len - 2);
            let fractional = scaled - integral as f32;
            let a = table[integral];
            let b = table[integral + 1];
            a + (b - a) * fractional
        }
    }
}
