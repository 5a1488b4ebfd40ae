//! The processing-engine boundary.
//!
//! The control loop never processes audio. It drives an engine through
//! [`Processor`]: flags, quality, algorithm, preset import/export and the
//! [`Parameters`] snapshot the input filter writes every tick.
//! [`EngineState`] is a plain in-memory implementation used by hosts without
//! an audio engine and by tests.

use grainctl_config::{NUM_QUALITY_LEVELS, PlaybackMode, Preset};
use grainctl_core::Parameters;

/// Control surface of a processing engine.
///
/// All calls are synchronous and must not block.
pub trait Processor {
    /// Engine is bypassed.
    fn bypass(&self) -> bool;
    /// Sets bypass.
    fn set_bypass(&mut self, bypass: bool);
    /// Buffer is frozen.
    fn frozen(&self) -> bool;
    /// Sets freeze.
    fn set_freeze(&mut self, frozen: bool);
    /// Playback runs backwards.
    fn reversed(&self) -> bool;
    /// Sets reverse playback.
    fn set_reverse(&mut self, reversed: bool);
    /// Reverb tail is held indefinitely.
    fn inf_reverb(&self) -> bool;
    /// Sets infinite reverb.
    fn set_inf_reverb(&mut self, enabled: bool);
    /// Output is muted.
    fn silenced(&self) -> bool;
    /// Mutes or unmutes the output.
    fn set_silence(&mut self, silenced: bool);
    /// Quality level, `0..NUM_QUALITY_LEVELS`.
    fn quality(&self) -> u8;
    /// Sets the quality level.
    fn set_quality(&mut self, quality: u8);
    /// Active algorithm.
    fn playback_mode(&self) -> PlaybackMode;
    /// Sets the algorithm.
    fn set_playback_mode(&mut self, mode: PlaybackMode);
    /// Parameter snapshot consumed by the engine.
    fn parameters(&self) -> &Parameters;
    /// Mutable parameter snapshot, written by the input filter.
    fn parameters_mut(&mut self) -> &mut Parameters;
    /// Output peak level, linear `[0, 1]`.
    fn peak(&self) -> f32;

    /// Flips bypass.
    fn toggle_bypass(&mut self) {
        let bypass = self.bypass();
        self.set_bypass(!bypass);
    }

    /// Flips freeze.
    fn toggle_freeze(&mut self) {
        let frozen = self.frozen();
        self.set_freeze(!frozen);
    }

    /// Flips reverse playback.
    fn toggle_reverse(&mut self) {
        let reversed = self.reversed();
        self.set_reverse(!reversed);
    }

    /// Recalls a preset: algorithm, quality and every knob value.
    fn load_preset(&mut self, preset: &Preset) {
        self.set_playback_mode(preset.playback_mode);
        self.set_quality(preset.quality());
        preset.apply_to(self.parameters_mut());
    }

    /// Captures the values the engine is currently using.
    fn export_preset(&self) -> Preset {
        Preset::capture(self.parameters(), self.playback_mode(), self.quality())
    }
}

/// In-memory engine state.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    bypass: bool,
    frozen: bool,
    reversed: bool,
    inf_reverb: bool,
    silenced: bool,
    quality: u8,
    playback_mode: PlaybackMode,
    parameters: Parameters,
    peak: f32,
}

impl EngineState {
    /// Engine at power-up defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reported output peak, clamped to `[0, 1]`.
    pub fn set_peak(&mut self, peak: f32) {
        self.peak = peak.clamp(0.0, 1.0);
    }
}

impl Processor for EngineState {
    fn bypass(&self) -> bool {
        self.bypass
    }

    fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    fn frozen(&self) -> bool {
        self.frozen
    }

    fn set_freeze(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn reversed(&self) -> bool {
        self.reversed
    }

    fn set_reverse(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    fn inf_reverb(&self) -> bool {
        self.inf_reverb
    }

    fn set_inf_reverb(&mut self, enabled: bool) {
        self.inf_reverb = enabled;
    }

    fn silenced(&self) -> bool {
        self.silenced
    }

    fn set_silence(&mut self, silenced: bool) {
        self.silenced = silenced;
    }

    fn quality(&self) -> u8 {
        self.quality
    }

    fn set_quality(&mut self, quality: u8) {
        self.quality = quality % NUM_QUALITY_LEVELS;
    }

    fn playback_mode(&self) -> PlaybackMode {
        self.playback_mode
    }

    fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.playback_mode = mode;
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    fn peak(&self) -> f32 {
        if self.bypass || self.silenced {
            0.0
        } else {
            self.peak
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grainctl_core::Authority;

    #[test]
    fn toggles() {
        let mut engine = EngineState::new();
        engine.toggle_bypass();
        engine.toggle_freeze();
        engine.toggle_reverse();
        assert!(engine.bypass() && engine.frozen() && engine.reversed());
        engine.toggle_freeze();
        assert!(!engine.frozen());
    }

    #[test]
    fn quality_wraps() {
        let mut engine = EngineState::new();
        engine.set_quality(5);
        assert_eq!(engine.quality(), 1);
    }

    #[test]
    fn load_preset_hands_authority_to_preset() {
        let mut engine = EngineState::new();
        engine.parameters_mut().size.update(0.8);
        let preset = Preset {
            version: grainctl_config::CURRENT_PRESET_VERSION,
            playback_mode: PlaybackMode::Stretch,
            stereo: false,
            low_fidelity: true,
            size: 0.3,
            ..Preset::EMPTY
        };
        engine.load_preset(&preset);
        assert_eq!(engine.playback_mode(), PlaybackMode::Stretch);
        assert_eq!(engine.quality(), 3);
        assert_eq!(engine.parameters().size.authority(), Authority::Loaded);
        assert_eq!(engine.parameters().size.value(), 0.3);

        let exported = engine.export_preset();
        assert_eq!(exported.size, 0.3);
        assert_eq!(exported.quality(), 3);
    }

    #[test]
    fn peak_dark_when_bypassed() {
        let mut engine = EngineState::new();
        engine.set_peak(0.6);
        assert_eq!(engine.peak(), 0.6);
        engine.set_bypass(true);
        assert_eq!(engine.peak(), 0.0);
        engine.set_peak(3.0);
        engine.set_bypass(false);
        assert_eq!(engine.peak(), 1.0);
    }
}
