//! A simulated front panel for desktop hosts and tests.

use grainctl_platform::{
    AdcChannel, InputFrame, LedFrame, NUM_SWITCHES, PlatformController, SimulatedAdc, SwitchId,
};

/// [`PlatformController`] backed by in-memory switch, jack and LED state.
///
/// Analog readings go through a [`SimulatedAdc`], so they reach the control
/// loop with the same pipeline delay as on hardware.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPanel {
    held: [bool; NUM_SWITCHES],
    gate: bool,
    adc: SimulatedAdc,
    leds: LedFrame,
    frames_written: u64,
}

impl SimulatedPanel {
    /// All switches up, pots at zero, V/Oct unpatched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presses or releases a switch.
    pub fn set_switch(&mut self, switch: SwitchId, held: bool) {
        self.held[switch.index()] = held;
    }

    /// True if `switch` is being held.
    pub fn is_held(&self, switch: SwitchId) -> bool {
        self.held[switch.index()]
    }

    /// Sets the voltage at an analog input, normalized to `[0, 1]`.
    pub fn set_adc(&mut self, channel: AdcChannel, value: f32) {
        self.adc.set(channel, value);
    }

    /// Sets the gate jack level.
    pub fn set_gate(&mut self, level: bool) {
        self.gate = level;
    }

    /// The last LED frame written by the control loop.
    pub fn leds(&self) -> &LedFrame {
        &self.leds
    }

    /// Number of LED frames written.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl PlatformController for SimulatedPanel {
    fn read_inputs(&mut self) -> InputFrame {
        InputFrame {
            switches: self.held.map(|held| !held),
            adc: self.adc.convert(),
            gate: self.gate,
        }
    }

    fn write_leds(&mut self, frame: &LedFrame) {
        self.leds = *frame;
        self.frames_written += 1;
    }
}
