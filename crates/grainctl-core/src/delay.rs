//! Fixed-depth latency line for realigning signals with different pipeline depths.
//!
//! The analog acquisition path delivers a reading several ticks after it was
//! sampled, while digital inputs (gate, trigger) are read immediately. To hand
//! the engine values that describe the same moment, the digital values are
//! pushed through a [`LatencyLine`] with the same depth as the analog pipeline.
//!
//! Each call to [`LatencyLine::process`] publishes the oldest stored value and
//! writes the newest one in its place, so a value written at tick `T` comes
//! out at tick `T + N`.
//!
//! # Example
//!
//! ```rust
//! use grainctl_core::LatencyLine;
//!
//! let mut trigger: LatencyLine<bool, 3> = LatencyLine::new();
//! let outputs: Vec<bool> = [true, false, false, false]
//!     .into_iter()
//!     .map(|edge| trigger.process(edge))
//!     .collect();
//! assert_eq!(outputs, [false, false, false, true]);
//! ```

/// Ring buffer delaying a `Copy` value by exactly `N` ticks.
///
/// Stack-allocated, compile-time depth, zero allocation. `N` must be at least 1;
/// a zero-depth line is rejected at compile time.
#[derive(Debug, Clone)]
pub struct LatencyLine<T, const N: usize> {
    buffer: [T; N],
    pos: usize,
}

impl<T: Copy + Default, const N: usize> LatencyLine<T, N> {
    const NON_EMPTY: () = assert!(N > 0, "latency line depth must be at least one tick");

    /// Creates a line filled with `T::default()`.
    pub fn new() -> Self {
        Self::filled(T::default())
    }

    /// Creates a line pre-filled with `value`.
    pub fn filled(value: T) -> Self {
        let () = Self::NON_EMPTY;
        Self {
            buffer: [value; N],
            pos: 0,
        }
    }

    /// Depth of the line in ticks.
    #[inline]
    pub const fn depth(&self) -> usize {
        N
    }

    /// Publishes the value written `N` ticks ago and stores `input`.
    #[inline]
    pub fn process(&mut self, input: T) -> T {
        let out = self.buffer[self.pos];
        self.buffer[self.pos] = input;
        self.pos = (self.pos + 1) % N;
        out
    }

    /// The value that the next [`process`](Self::process) call will publish.
    #[inline]
    pub fn peek(&self) -> T {
        self.buffer[self.pos]
    }

    /// Refills the line with `T::default()`.
    pub fn clear(&mut self) {
        self.buffer = [T::default(); N];
        self.pos = 0;
    }
}

impl<T: Copy + Default, const N: usize> Default for LatencyLine<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_by_depth() {
        let mut line: LatencyLine<u32, 5> = LatencyLine::new();
        for tick in 0..5 {
            assert_eq!(line.process(tick + 1), 0, "tick {tick} should still be empty");
        }
        for tick in 5..20 {
            assert_eq!(line.process(tick + 1), tick - 4);
        }
    }

    #[test]
    fn single_pulse_reappears_once() {
        let mut line: LatencyLine<bool, 5> = LatencyLine::new();
        let mut seen = 0;
        for tick in 0..32 {
            let out = line.process(tick == 3);
            if out {
                assert_eq!(tick, 8);
                seen += 1;
            }
        }
        assert_eq!(seen, 1);
    }

    #[test]
    fn peek_matches_next_output() {
        let mut line: LatencyLine<u8, 2> = LatencyLine::new();
        line.process(7);
        line.process(9);
        assert_eq!(line.peek(), 7);
        assert_eq!(line.process(0), 7);
    }

    #[test]
    fn clear_resets_contents() {
        let mut line: LatencyLine<f32, 3> = LatencyLine::filled(1.0);
        line.clear();
        assert_eq!(line.process(0.0), 0.0);
        assert_eq!(line.depth(), 3);
    }
}
