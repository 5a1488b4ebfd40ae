//! One-pole smoother for analog control inputs.
//!
//! A single-pole IIR lowpass written in the "leaky integrator" form used for
//! control-rate signals:
//!
//! ```text
//! y[n] = y[n-1] + k * (x[n] - y[n-1])
//! ```
//!
//! `k` is the raw filter coefficient in `(0, 1]`. `k = 1.0` passes the input
//! through unchanged (used for 1V/octave inputs that must track instantly);
//! small values such as `0.01` heavily smooth noisy potentiometers.
//!
//! # Usage
//!
//! ```rust
//! use grainctl_core::OnePole;
//!
//! let mut pot = OnePole::new(0.05);
//! for _ in 0..200 {
//!     pot.process(1.0);
//! }
//! assert!(pot.value() > 0.99);
//! ```

/// One-pole exponential smoother with a fixed coefficient.
///
/// # Invariants
///
/// - `coeff` is clamped to `[0, 1]`; `0` freezes the output, `1` is a wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Create a smoother with the given coefficient, starting at zero.
    pub fn new(coeff: f32) -> Self {
        Self::with_initial(coeff, 0.0)
    }

    /// Create a smoother with the given coefficient and starting value.
    pub fn with_initial(coeff: f32, initial: f32) -> Self {
        Self {
            state: initial,
            coeff: coeff.clamp(0.0, 1.0),
        }
    }

    /// Returns the smoothing coefficient.
    #[inline]
    pub const fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Feed one reading and return the smoothed value.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state += self.coeff * (input - self.state);
        self.state
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub const fn value(&self) -> f32 {
        self.state
    }

    /// Snap the state to a value.
    pub fn reset(&mut self, value: f32) {
        self.state = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_coefficient_is_a_wire() {
        let mut voct = OnePole::new(1.0);
        assert_eq!(voct.process(0.73), 0.73);
        assert_eq!(voct.process(0.12), 0.12);
    }

    #[test]
    fn converges_to_constant_input() {
        let mut pot = OnePole::new(0.01);
        for _ in 0..2000 {
            pot.process(0.6);
        }
        assert!(
            (pot.value() - 0.6).abs() < 1e-4,
            "should settle on input, got {}",
            pot.value()
        );
    }

    #[test]
    fn single_step_moves_by_coefficient() {
        let mut pot = OnePole::with_initial(0.05, 0.0);
        let out = pot.process(1.0);
        assert!((out - 0.05).abs() < 1e-7);
    }

    #[test]
    fn coefficient_is_clamped() {
        assert_eq!(OnePole::new(3.0).coefficient(), 1.0);
        assert_eq!(OnePole::new(-1.0).coefficient(), 0.0);
    }

    #[test]
    fn reset_snaps_state() {
        let mut pot = OnePole::new(0.01);
        pot.process(1.0);
        pot.reset(0.4);
        assert_eq!(pot.value(), 0.4);
    }
}
