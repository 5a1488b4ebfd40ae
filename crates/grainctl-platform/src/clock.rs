//! Millisecond tick clock.

/// Control-loop rate. One tick is one millisecond.
pub const TICK_RATE_HZ: u32 = 1000;

/// Monotonic tick counter driven by the control loop.
///
/// The counter wraps after roughly 49 days; every consumer measures
/// durations with wrapping subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickClock {
    ticks: u32,
}

impl TickClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// A clock starting at `ticks`.
    pub const fn starting_at(ticks: u32) -> Self {
        Self { ticks }
    }

    /// Advances one tick and returns the new time.
    #[inline]
    pub fn tick(&mut self) -> u32 {
        self.ticks = self.ticks.wrapping_add(1);
        self.ticks
    }

    /// Current time in milliseconds.
    #[inline]
    pub const fn now(&self) -> u32 {
        self.ticks
    }

    /// Milliseconds elapsed since `earlier`.
    #[inline]
    pub const fn since(&self, earlier: u32) -> u32 {
        self.ticks.wrapping_sub(earlier)
    }

    /// Converts a tick count to seconds.
    #[inline]
    pub fn to_seconds(ticks: u32) -> f32 {
        ticks as f32 / TICK_RATE_HZ as f32
    }
}
