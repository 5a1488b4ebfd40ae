//! Pickup parameters for jump-free preset recall.
//!
//! Recalling a preset sets every continuous parameter to a stored value while
//! the physical knobs stay wherever they were. If the knobs took over
//! immediately, the sound would jump. Instead each [`Parameter`] keeps two
//! backing values and an explicit [`Authority`] tag:
//!
//! - **Live**: the value follows the hardware reading.
//! - **Loaded**: the value is the recalled one; the knob is inert.
//!
//! Once the hardware reading comes within [`PICKUP_TOLERANCE`] of the loaded
//! value, authority hands back to the knob. The handoff is one-way: only a new
//! [`Parameter::load`] makes a loaded value authoritative again.
//!
//! ## Usage
//!
//! ```rust
//! use grainctl_core::{Authority, Parameter};
//!
//! let mut size = Parameter::new(0.1);
//! size.load(0.5);
//! assert_eq!(size.authority(), Authority::Loaded);
//!
//! size.update(0.3); // knob far away: ignored
//! assert_eq!(size.value(), 0.5);
//!
//! size.update(0.495); // within 1%: picked up
//! assert_eq!(size.authority(), Authority::Live);
//! assert_eq!(size.value(), 0.495);
//! ```

/// Distance under which a live reading picks up a loaded value (1% of range).
pub const PICKUP_TOLERANCE: f32 = 0.01;

/// Which backing value of a [`Parameter`] is currently authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Authority {
    /// The value follows the live control reading.
    #[default]
    Live,
    /// The value is the last loaded (preset) value.
    Loaded,
}

/// A continuous control with a live reading, a loaded value, and an authority tag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Parameter {
    live: f32,
    loaded: f32,
    authority: Authority,
}

impl Parameter {
    /// Creates a parameter following the live reading, starting at `initial`.
    pub const fn new(initial: f32) -> Self {
        Self {
            live: initial,
            loaded: initial,
            authority: Authority::Live,
        }
    }

    /// Records a new live reading and picks up the loaded value if close enough.
    #[inline]
    pub fn update(&mut self, control_value: f32) {
        self.live = control_value;
        if self.authority == Authority::Loaded
            && libm::fabsf(control_value - self.loaded) < PICKUP_TOLERANCE
        {
            #[cfg(feature = "tracing")]
            tracing::trace!("pickup: knob reached loaded value {}", self.loaded);
            self.sync();
        }
    }

    /// Makes `value` authoritative until the knob reaches it.
    #[inline]
    pub fn load(&mut self, value: f32) {
        #[cfg(feature = "tracing")]
        tracing::trace!("pickup: loaded {value}, live reading {}", self.live);
        self.loaded = value;
        self.authority = Authority::Loaded;
    }

    /// Hands authority to the live reading unconditionally.
    #[inline]
    pub fn sync(&mut self) {
        self.authority = Authority::Live;
    }

    /// The authoritative value.
    #[inline]
    pub const fn value(&self) -> f32 {
        match self.authority {
            Authority::Live => self.live,
            Authority::Loaded => self.loaded,
        }
    }

    /// The last live reading, regardless of authority.
    #[inline]
    pub const fn live(&self) -> f32 {
        self.live
    }

    /// The last loaded value, regardless of authority.
    #[inline]
    pub const fn loaded(&self) -> f32 {
        self.loaded
    }

    /// Current authority.
    #[inline]
    pub const fn authority(&self) -> Authority {
        self.authority
    }

    /// True when the knob controls the value.
    #[inline]
    pub const fn is_picked_up(&self) -> bool {
        matches!(self.authority, Authority::Live)
    }
}

/// Snapshot of all engine-facing controls, produced once per tick.
///
/// Gate and trigger are already realigned with the analog path, so every field
/// describes the same moment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Parameters {
    /// Grain/buffer read position.
    pub position: Parameter,
    /// Grain size.
    pub size: Parameter,
    /// Transposition in semitones.
    pub pitch: Parameter,
    /// Grain density.
    pub density: Parameter,
    /// Grain envelope texture.
    pub texture: Parameter,
    /// Dry/wet balance.
    pub dry_wet: Parameter,
    /// Stereo spread.
    pub stereo_spread: Parameter,
    /// Feedback amount.
    pub feedback: Parameter,
    /// Reverb amount.
    pub reverb: Parameter,
    /// Buffer freeze, mirrored from the engine state.
    pub freeze: bool,
    /// Trigger rising edge, latency-aligned.
    pub trigger: bool,
    /// Gate level, latency-aligned.
    pub gate: bool,
}

impl Parameters {
    /// Creates a snapshot with every control at zero and following its knob.
    pub const fn new() -> Self {
        Self {
            position: Parameter::new(0.0),
            size: Parameter::new(0.0),
            pitch: Parameter::new(0.0),
            density: Parameter::new(0.0),
            texture: Parameter::new(0.0),
            dry_wet: Parameter::new(0.0),
            stereo_spread: Parameter::new(0.0),
            feedback: Parameter::new(0.0),
            reverb: Parameter::new(0.0),
            freeze: false,
            trigger: false,
            gate: false,
        }
    }

    /// Iterates over the continuous controls in a fixed order.
    pub fn continuous(&self) -> [&Parameter; 9] {
        [
            &self.position,
            &self.size,
            &self.pitch,
            &self.density,
            &self.texture,
            &self.dry_wet,
            &self.stereo_spread,
            &self.feedback,
            &self.reverb,
        ]
    }
}
