//! grainctl Platform - hardware-facing control layer
//!
//! This crate turns raw, noisy hardware readings into clean events and
//! latency-aligned parameter snapshots: switch debouncing, multi-switch
//! gesture classification, the event queue, and analog CV scaling.
//!
//! # Core Abstractions
//!
//! ## Control System
//!
//! - [`ControlId`] - Namespaced control identifier (single switch or combo)
//! - [`ControlType`] - Kind of physical control (switch, pot, CV, gate, LED)
//! - [`SwitchId`] - The four front-panel switches
//!
//! ## Per-Tick Pipeline
//!
//! - [`Switches`] / [`Switch`] - Shift-register debounce and press state
//! - [`GestureClassifier`] - Single, long, very-long and combo gestures
//! - [`EventQueue`] - Bounded FIFO with an idle clock
//! - [`CvScaler`] - Analog smoothing, calibration and gate realignment
//!
//! ## Platform Controller
//!
//! - [`PlatformController`] - Trait for hardware/simulated input sources
//! - [`InputFrame`] / [`LedFrame`] - One tick of inputs and outputs
//!
//! # Control ID Namespaces
//!
//! Control IDs use a 16-bit identifier with namespace prefixes:
//!
//! - `0x00XX` - Single switches (low byte = switch index)
//! - `0x01XX` - Combos (low byte = bitmask of participating switches)
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! grainctl-platform = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod adc;
pub mod clock;
pub mod cv_scaler;
pub mod event;
pub mod gesture;
pub mod switch;

// Re-export grainctl-core types for convenience
pub use grainctl_core::{Parameter, Parameters};

// Re-export main types at crate root
pub use adc::SimulatedAdc;
pub use clock::{TICK_RATE_HZ, TickClock};
pub use cv_scaler::{
    ADC_CHANNEL_COUNT, ADC_LATENCY, AdcChannel, CalibrationData, CalibrationError, CvInputConfig,
    CvInputTable, CvOffset, CvPolarity, CvScaler, V_OCT_REST_READING, solve_pitch_calibration,
};
pub use event::{EVENT_QUEUE_CAPACITY, Event, EventQueue, QueueError};
pub use gesture::{GestureClassifier, LONG_PRESS_MS, VERY_LONG_PRESS_MS};
pub use switch::{NUM_SWITCHES, Switch, SwitchState, Switches};

/// Namespace identifiers for control sources.
pub mod namespace {
    /// Single front-panel switches.
    pub const SWITCH: u16 = 0x0000;
    /// Multi-switch combos.
    pub const COMBO: u16 = 0x0100;
}

/// The front-panel momentary switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SwitchId {
    /// Mode / quality / load.
    Mode = 0,
    /// Write / playback mode / save.
    Write = 1,
    /// Freeze / reverse.
    Freeze = 2,
    /// Bypass / infinite reverb.
    Bypass = 3,
}

impl SwitchId {
    /// All switches in index order.
    pub const ALL: [SwitchId; NUM_SWITCHES] = [
        SwitchId::Mode,
        SwitchId::Write,
        SwitchId::Freeze,
        SwitchId::Bypass,
    ];

    /// Index into the switch bank.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bit of this switch in a combo mask.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }

    /// Switch at `index`, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(SwitchId::Mode),
            1 => Some(SwitchId::Write),
            2 => Some(SwitchId::Freeze),
            3 => Some(SwitchId::Bypass),
            _ => None,
        }
    }

    /// Lowercase name, as used in scripts and logs.
    pub const fn name(self) -> &'static str {
        match self {
            SwitchId::Mode => "mode",
            SwitchId::Write => "write",
            SwitchId::Freeze => "freeze",
            SwitchId::Bypass => "bypass",
        }
    }
}

/// A namespaced control identifier.
///
/// The high byte is the namespace, the low byte the index within it. Single
/// switches carry their switch index; combos carry the bitmask of the
/// switches that were active together, so every combination has a distinct,
/// stable identifier.
///
/// # Example
///
/// ```rust
/// use grainctl_platform::{ControlId, SwitchId};
///
/// let write = ControlId::switch(SwitchId::Write);
/// assert_eq!(write.raw(), 0x0001);
/// assert_eq!(write.as_switch(), Some(SwitchId::Write));
///
/// let combo = ControlId::combo(SwitchId::Freeze.mask() | SwitchId::Bypass.mask());
/// assert_eq!(combo.raw(), 0x010C);
/// assert_eq!(combo, ControlId::COMBO_FREEZE_BYPASS);
/// assert!(combo.as_switch().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlId(u16);

impl ControlId {
    /// FREEZE and BYPASS held together.
    pub const COMBO_FREEZE_BYPASS: ControlId =
        ControlId::combo(SwitchId::Freeze.mask() | SwitchId::Bypass.mask());

    /// Creates a ControlId from a raw 16-bit value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Creates a single-switch control ID (namespace 0x00XX).
    #[inline]
    pub const fn switch(id: SwitchId) -> Self {
        Self(namespace::SWITCH | id as u16)
    }

    /// Creates a combo control ID from a switch bitmask (namespace 0x01XX).
    #[inline]
    pub const fn combo(mask: u8) -> Self {
        Self(namespace::COMBO | mask as u16)
    }

    /// Returns the raw 16-bit value.
    #[inline]
    pub const fn raw(&self) -> u16 {
        self.0
    }

    /// Returns the namespace portion (high byte).
    #[inline]
    pub const fn namespace(&self) -> u16 {
        self.0 & 0xFF00
    }

    /// Returns the index within the namespace (low byte).
    #[inline]
    pub const fn index(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Returns true if this identifies a single switch.
    #[inline]
    pub const fn is_switch(&self) -> bool {
        self.namespace() == namespace::SWITCH
    }

    /// Returns true if this identifies a combo.
    #[inline]
    pub const fn is_combo(&self) -> bool {
        self.namespace() == namespace::COMBO
    }

    /// The single switch this identifies, if any.
    pub const fn as_switch(&self) -> Option<SwitchId> {
        if self.is_switch() {
            SwitchId::from_index(self.index() as usize)
        } else {
            None
        }
    }

    /// The participating switch mask, if this is a combo.
    pub const fn combo_mask(&self) -> Option<u8> {
        if self.is_combo() { Some(self.index()) } else { None }
    }
}

impl core::fmt::Display for ControlId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(switch) = self.as_switch() {
            return write!(f, "{}", switch.name());
        }
        if let Some(mask) = self.combo_mask() {
            let mut first = true;
            for switch in SwitchId::ALL {
                if mask & switch.mask() != 0 {
                    if !first {
                        f.write_str("+")?;
                    }
                    f.write_str(switch.name())?;
                    first = false;
                }
            }
            return Ok(());
        }
        write!(f, "control({:#06x})", self.0)
    }
}

/// Physical control type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// Momentary switch (pressed = pin low).
    Switch,
    /// Front-panel potentiometer, optionally summed with a CV jack.
    Pot,
    /// Control-voltage input jack.
    Cv,
    /// Digital gate/trigger jack.
    Gate,
    /// Status LED.
    Led,
}

impl ControlType {
    /// Returns true if this is an output control (LED).
    #[inline]
    pub const fn is_output(&self) -> bool {
        matches!(self, ControlType::Led)
    }

    /// Returns true if this is an input control.
    #[inline]
    pub const fn is_input(&self) -> bool {
        !self.is_output()
    }
}

/// One tick worth of raw hardware inputs.
///
/// Switch pins are active-low: `true` means the pin reads high (released).
/// Analog readings are normalized to `[0, 1]` and already carry the
/// converter's pipeline latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputFrame {
    /// Pin level per switch, indexed by [`SwitchId::index`].
    pub switches: [bool; NUM_SWITCHES],
    /// Normalized ADC reading per channel, indexed by [`AdcChannel::index`].
    pub adc: [f32; ADC_CHANNEL_COUNT],
    /// External gate jack level.
    pub gate: bool,
}

impl InputFrame {
    /// All switches released, pots at zero, V/Oct at its unpatched reading.
    pub fn released() -> Self {
        let mut adc = [0.0; ADC_CHANNEL_COUNT];
        adc[AdcChannel::VOct.index()] = V_OCT_REST_READING;
        Self {
            switches: [true; NUM_SWITCHES],
            adc,
            gate: false,
        }
    }

    /// Returns a copy with `switch` held down.
    pub fn with_held(mut self, switch: SwitchId) -> Self {
        self.switches[switch.index()] = false;
        self
    }

    /// True if `switch` reads as held in this frame.
    #[inline]
    pub fn is_held(&self, switch: SwitchId) -> bool {
        !self.switches[switch.index()]
    }

    /// Reading for `channel`.
    #[inline]
    pub fn adc(&self, channel: AdcChannel) -> f32 {
        self.adc[channel.index()]
    }
}

impl Default for InputFrame {
    fn default() -> Self {
        Self::released()
    }
}

/// Number of bicolor status LEDs.
pub const NUM_STATUS_LEDS: usize = 4;

/// Intensity of one bicolor status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLed {
    /// Red element, 0-255.
    pub red: u8,
    /// Green element, 0-255.
    pub green: u8,
}

impl StatusLed {
    /// Both elements off.
    pub const OFF: StatusLed = StatusLed { red: 0, green: 0 };

    /// Creates an LED state.
    pub const fn new(red: u8, green: u8) -> Self {
        Self { red, green }
    }

    /// True if either element is lit.
    pub const fn is_lit(&self) -> bool {
        self.red != 0 || self.green != 0
    }
}

/// Visual descriptor handed to the display driver once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedFrame {
    /// Status LEDs, left to right.
    pub status: [StatusLed; NUM_STATUS_LEDS],
    /// Freeze button LED.
    pub freeze: bool,
    /// False while the module is bypassed; the driver dims everything.
    pub enabled: bool,
}

impl LedFrame {
    /// Everything off, outputs enabled.
    pub const fn new() -> Self {
        Self {
            status: [StatusLed::OFF; NUM_STATUS_LEDS],
            freeze: false,
            enabled: true,
        }
    }

    /// Sets one status LED. Out-of-range indices are ignored.
    pub fn set_status(&mut self, index: usize, red: u8, green: u8) {
        if let Some(led) = self.status.get_mut(index) {
            *led = StatusLed::new(red, green);
        }
    }

    /// Sets both elements of one status LED to the same intensity.
    pub fn set_intensity(&mut self, index: usize, value: u8) {
        self.set_status(index, value, value);
    }

    /// Number of status LEDs with any element lit.
    pub fn lit_count(&self) -> usize {
        self.status.iter().filter(|led| led.is_lit()).count()
    }
}

impl Default for LedFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for platform-specific controller implementations.
///
/// Implement this for the hardware board (GPIO + ADC + LED driver) or for a
/// simulated front panel. The control loop calls [`poll`](Self::poll), then
/// [`read_inputs`](Self::read_inputs) once per tick, and finally
/// [`write_leds`](Self::write_leds) and [`flush`](Self::flush).
///
/// # Thread Safety
///
/// This trait does not require thread safety. The control loop owns the
/// controller exclusively.
pub trait PlatformController {
    /// Samples every switch pin, ADC channel and gate jack once.
    fn read_inputs(&mut self) -> InputFrame;

    /// Hands the visual descriptor to the display driver.
    fn write_leds(&mut self, frame: &LedFrame);

    /// Updates controller state before sampling (e.g. starts a conversion).
    ///
    /// Default implementation does nothing.
    fn poll(&mut self) {}

    /// Flushes pending output changes to hardware.
    ///
    /// Default implementation does nothing.
    fn flush(&mut self) {}
}
