//! The mode state machine executor.

use grainctl_config::{NUM_QUALITY_LEVELS, PresetLocation, Settings, SettingsStore};
use grainctl_platform::{
    ControlType, CvInputTable, CvScaler, Event, EventQueue, GestureClassifier, InputFrame,
    LedFrame, SwitchId, Switches,
};

use crate::mode::{self, Command, IdleAction, UiMode};
use crate::{FactoryCommand, Processor, UiError, leds};

/// Owns the switches, event queue, input filter, settings and engine, and
/// runs one control tick at a time.
///
/// Each tick runs in a fixed order:
///
/// 1. [`poll`](Self::poll): debounce scan and gesture classification
/// 2. [`do_events`](Self::do_events): drain the queue, apply idle timeouts
/// 3. [`read_inputs`](Self::read_inputs): analog conditioning into the engine parameters
/// 4. [`paint`](Self::paint): render the LEDs
#[derive(Debug)]
pub struct Ui<S: SettingsStore, P: Processor> {
    mode: UiMode,
    settings: Settings<S>,
    processor: P,
    cv: CvScaler,
    switches: Switches,
    classifier: GestureClassifier,
    queue: EventQueue,
    cursor: PresetLocation,
}

impl<S: SettingsStore, P: Processor> Ui<S, P> {
    /// Restores the engine state from `settings` and chooses the start mode
    /// from the switch levels at power-up.
    ///
    /// Holding WRITE at power-up enters Calibration-1. Switches held at
    /// power-up never produce a press or release event.
    pub fn new(settings: Settings<S>, mut processor: P, power_up: &InputFrame) -> Self {
        let state = *settings.state();
        processor.set_quality(state.quality % NUM_QUALITY_LEVELS);
        processor.set_playback_mode(state.playback_mode);

        let mut switches = Switches::new();
        switches.settle(&power_up.switches);

        let mode = if Switches::pressed_immediate(&power_up.switches, SwitchId::Write) {
            tracing::info!("WRITE held at power-up, entering calibration");
            UiMode::Calibration1
        } else {
            UiMode::Splash
        };

        Self {
            mode,
            cv: CvScaler::new(&CvInputTable::DEFAULT, *settings.calibration()),
            settings,
            processor,
            switches,
            classifier: GestureClassifier::new(),
            queue: EventQueue::new(),
            cursor: PresetLocation::default(),
        }
    }

    /// Runs one full tick and returns the LED frame to display.
    pub fn tick(&mut self, now: u32, frame: &InputFrame) -> Result<LedFrame, UiError> {
        self.poll(now, frame)?;
        self.do_events(now);
        self.read_inputs(frame);
        Ok(self.paint(now))
    }

    /// Scans the switches and queues classified gestures.
    ///
    /// # Errors
    ///
    /// [`UiError::EventQueue`] if the queue overflows.
    pub fn poll(&mut self, now: u32, frame: &InputFrame) -> Result<(), UiError> {
        self.switches.scan(&frame.switches);
        self.classifier
            .classify(&mut self.switches, now, &mut self.queue)?;
        Ok(())
    }

    /// Handles every pending event, then the idle timeouts.
    pub fn do_events(&mut self, now: u32) {
        while let Some(event) = self.queue.pop() {
            if event.control_type == ControlType::Switch {
                self.on_switch_event(&event);
            }
        }

        if let IdleAction::Touch(next) = mode::on_idle(self.mode, self.queue.idle_time(now)) {
            self.queue.touch(now);
            self.set_mode(next);
        }

        if self.processor.inf_reverb() && !self.switches.get(SwitchId::Bypass).pressed() {
            self.processor.set_inf_reverb(false);
        }
    }

    /// Conditions the analog inputs into the engine parameters.
    pub fn read_inputs(&mut self, frame: &InputFrame) {
        let frozen = self.processor.frozen();
        let params = self.processor.parameters_mut();
        self.cv.read(frame, params);
        params.freeze = frozen;
    }

    /// Renders the LEDs for the current mode.
    pub fn paint(&self, now: u32) -> LedFrame {
        leds::paint(self.mode, now, &self.processor, self.cursor)
    }

    /// Applies one switch event.
    pub fn on_switch_event(&mut self, event: &Event) {
        let transition = mode::on_switch_event(self.mode, event);
        self.set_mode(transition.mode);
        if let Some(command) = transition.command {
            self.execute(command);
        }
    }

    /// Answers a factory-test request. Never blocks.
    pub fn handle_factory_request(&mut self, request: u8) -> u8 {
        match FactoryCommand::decode(request) {
            FactoryCommand::ReadPot(channel) | FactoryCommand::ReadCv(channel) => {
                self.cv.adc_value(usize::from(channel))
            }
            // arguments above 2 address gate inputs, and only gate 0 exists
            FactoryCommand::ReadGate(index @ 0..=2) => SwitchId::from_index(usize::from(index))
                .map_or(0, |switch| u8::from(self.switches.get(switch).pressed())),
            FactoryCommand::ReadGate(3) => u8::from(self.cv.gate()),
            FactoryCommand::ReadGate(_) => 0,
            FactoryCommand::SetBypass(bypass) => {
                self.processor.set_bypass(bypass);
                0
            }
            FactoryCommand::Calibrate(0) => {
                self.set_mode(UiMode::Calibration1);
                0
            }
            FactoryCommand::Calibrate(1) => {
                self.calibrate_c1();
                0
            }
            FactoryCommand::Calibrate(_) => {
                self.calibrate_c3();
                0
            }
            FactoryCommand::Unknown(_) => 0,
        }
    }

    fn set_mode(&mut self, mode: UiMode) {
        if mode != self.mode {
            tracing::debug!("mode: {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn execute(&mut self, command: Command) {
        tracing::debug!("command: {command:?}");
        match command {
            Command::ToggleBypass => self.processor.toggle_bypass(),
            Command::SetInfiniteReverb => self.processor.set_inf_reverb(true),
            Command::ToggleFreeze => self.processor.toggle_freeze(),
            Command::ToggleReverse => self.processor.toggle_reverse(),
            Command::IncrementQuality => {
                let quality = (self.processor.quality() + 1) % NUM_QUALITY_LEVELS;
                self.processor.set_quality(quality);
                self.save_state();
            }
            Command::IncrementPlaybackMode => {
                let mode = self.processor.playback_mode().next();
                self.processor.set_playback_mode(mode);
                self.save_state();
            }
            Command::DecrementPlaybackMode => {
                let mode = self.processor.playback_mode().previous();
                self.processor.set_playback_mode(mode);
                self.save_state();
            }
            Command::LoadPreset => self.load_preset(),
            Command::SavePreset => self.save_preset(),
            Command::AdvanceCursor => self.advance_cursor(),
            Command::CalibrateC1 => self.calibrate_c1(),
            Command::CalibrateC3 => self.calibrate_c3(),
        }
    }

    fn advance_cursor(&mut self) {
        self.settings.increment_location(&mut self.cursor);
    }

    fn load_preset(&mut self) {
        match self.settings.presets().preset(self.cursor) {
            Ok(preset) => {
                let preset = *preset;
                self.processor.load_preset(&preset);
                tracing::info!("loaded preset {}", self.cursor);
            }
            Err(e) => tracing::debug!("preset load skipped: {e}"),
        }
        self.advance_cursor();
    }

    fn save_preset(&mut self) {
        let target = self.mode;
        self.set_mode(UiMode::Saving);
        self.processor.set_silence(true);

        let preset = self.processor.export_preset();
        match self.settings.presets_mut().preset_mut(self.cursor) {
            Ok(slot) => {
                *slot = preset;
                match self.settings.save_presets() {
                    Ok(()) => tracing::info!("saved preset {}", self.cursor),
                    Err(e) => tracing::warn!("failed to persist preset {}: {e}", self.cursor),
                }
            }
            Err(e) => tracing::warn!("preset save skipped: {e}"),
        }

        self.processor.set_silence(false);
        self.advance_cursor();
        self.set_mode(target);
    }

    fn save_state(&mut self) {
        let state = self.settings.state_mut();
        state.quality = self.processor.quality();
        state.playback_mode = self.processor.playback_mode();
        self.persist_settings();
    }

    fn persist_settings(&mut self) {
        if let Err(e) = self.settings.save() {
            tracing::warn!("failed to persist settings: {e}");
        }
    }

    fn calibrate_c1(&mut self) {
        self.cv.calibrate_c1();
        self.set_mode(UiMode::Calibration2);
    }

    fn calibrate_c3(&mut self) {
        match self.cv.calibrate_c3() {
            Ok(()) => {
                *self.settings.calibration_mut() = *self.cv.calibration();
                self.persist_settings();
                tracing::info!("calibration accepted");
                self.set_mode(UiMode::VuMeter);
            }
            Err(e) => {
                tracing::warn!("calibration rejected: {e}");
                self.cv.set_calibration(*self.settings.calibration());
                self.set_mode(UiMode::Panic);
            }
        }
    }

    /// Active mode.
    #[inline]
    pub fn mode(&self) -> UiMode {
        self.mode
    }

    /// Preset cursor shared by Load and Save.
    #[inline]
    pub fn cursor(&self) -> PresetLocation {
        self.cursor
    }

    /// The engine.
    #[inline]
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Mutable engine access, for hosts that feed it audio-side state.
    #[inline]
    pub fn processor_mut(&mut self) -> &mut P {
        &mut self.processor
    }

    /// Settings manager.
    #[inline]
    pub fn settings(&self) -> &Settings<S> {
        &self.settings
    }

    /// Input filter.
    #[inline]
    pub fn cv(&self) -> &CvScaler {
        &self.cv
    }

    /// Switch bank.
    #[inline]
    pub fn switches(&self) -> &Switches {
        &self.switches
    }

    /// Pending events and idle clock.
    #[inline]
    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Drops every pending event.
    pub fn flush_events(&mut self) {
        self.queue.flush();
    }

    /// Consumes the UI and returns its settings and engine.
    pub fn into_parts(self) -> (Settings<S>, P) {
        (self.settings, self.processor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EngineState;
    use grainctl_config::{MemoryStore, PlaybackMode};
    use grainctl_platform::{AdcChannel, ControlId, SwitchState};

    fn ui() -> Ui<MemoryStore, EngineState> {
        Ui::new(
            Settings::init(MemoryStore::new()),
            EngineState::new(),
            &InputFrame::released(),
        )
    }

    fn tap(switch: SwitchId) -> Event {
        Event::switch(ControlId::switch(switch), SwitchState::Released, 0)
    }

    #[test]
    fn starts_in_splash_and_any_tap_dismisses() {
        let mut ui = ui();
        assert_eq!(ui.mode(), UiMode::Splash);
        ui.on_switch_event(&tap(SwitchId::Freeze));
        assert_eq!(ui.mode(), UiMode::VuMeter);
        assert!(!ui.processor().frozen());
    }

    #[test]
    fn write_held_at_power_up_enters_calibration() {
        let frame = InputFrame::released().with_held(SwitchId::Write);
        let ui = Ui::new(
            Settings::init(MemoryStore::new()),
            EngineState::new(),
            &frame,
        );
        assert_eq!(ui.mode(), UiMode::Calibration1);
        assert_eq!(ui.switches().get(SwitchId::Write).state(), SwitchState::Released);
    }

    #[test]
    fn restores_saved_state() {
        let mut settings = Settings::init(MemoryStore::new());
        settings.state_mut().quality = 2;
        settings.state_mut().playback_mode = PlaybackMode::Spectral;
        let ui = Ui::new(settings, EngineState::new(), &InputFrame::released());
        assert_eq!(ui.processor().quality(), 2);
        assert_eq!(ui.processor().playback_mode(), PlaybackMode::Spectral);
    }

    #[test]
    fn quality_increment_persists() {
        let mut ui = ui();
        ui.set_mode(UiMode::Quality);
        for _ in 0..5 {
            ui.on_switch_event(&tap(SwitchId::Mode));
        }
        assert_eq!(ui.processor().quality(), 1);
        assert_eq!(ui.settings().state().quality, 1);
        // one bake at init plus five changes
        assert_eq!(ui.settings().store().settings_saves(), 6);
    }

    #[test]
    fn playback_mode_wraps_both_ways() {
        let mut ui = ui();
        ui.set_mode(UiMode::PlaybackMode);
        ui.on_switch_event(&tap(SwitchId::Mode));
        assert_eq!(ui.processor().playback_mode(), PlaybackMode::Resonestor);
        ui.on_switch_event(&tap(SwitchId::Write));
        assert_eq!(ui.processor().playback_mode(), PlaybackMode::Granular);
        assert_eq!(ui.settings().state().playback_mode, PlaybackMode::Granular);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let mut ui = ui();
        ui.processor_mut().parameters_mut().texture.update(0.42);
        ui.processor_mut().set_playback_mode(PlaybackMode::LoopingDelay);
        ui.set_mode(UiMode::Save);
        ui.on_switch_event(&Event::switch(
            ControlId::switch(SwitchId::Write),
            SwitchState::LongPressed,
            0,
        ));
        assert_eq!(ui.mode(), UiMode::VuMeter);
        assert_eq!(ui.cursor(), PresetLocation::new(0, 1));
        assert!(!ui.processor().silenced());
        assert_eq!(ui.settings().presets().written(), 1);

        ui.processor_mut().set_playback_mode(PlaybackMode::Granular);
        ui.cursor = PresetLocation::new(0, 0);
        ui.set_mode(UiMode::Load);
        ui.on_switch_event(&Event::switch(
            ControlId::switch(SwitchId::Mode),
            SwitchState::LongPressed,
            0,
        ));
        assert_eq!(ui.processor().playback_mode(), PlaybackMode::LoopingDelay);
        assert_eq!(ui.processor().parameters().texture.value(), 0.42);
        assert_eq!(ui.cursor(), PresetLocation::new(0, 1));
    }

    #[test]
    fn loading_empty_slot_still_advances() {
        let mut ui = ui();
        ui.set_mode(UiMode::Load);
        ui.on_switch_event(&Event::switch(
            ControlId::switch(SwitchId::Freeze),
            SwitchState::LongPressed,
            0,
        ));
        assert_eq!(ui.mode(), UiMode::VuMeter);
        assert_eq!(ui.cursor(), PresetLocation::new(0, 1));
        assert_eq!(ui.processor().playback_mode(), PlaybackMode::Granular);
    }

    #[test]
    fn factory_requests() {
        let mut ui = ui();
        let mut frame = InputFrame::released();
        frame.adc[AdcChannel::Reverb.index()] = 1.0;
        frame.gate = true;
        ui.read_inputs(&frame);

        assert_eq!(ui.handle_factory_request(0x09), 255);
        assert_eq!(ui.handle_factory_request(0x20), 0);
        assert_eq!(ui.handle_factory_request(0x43), 1);
        assert_eq!(ui.handle_factory_request(0x44), 0);
        assert_eq!(ui.handle_factory_request(0x42), 0);

        ui.handle_factory_request(0x61);
        assert!(ui.processor().bypass());
        ui.handle_factory_request(0x60);
        assert!(!ui.processor().bypass());

        ui.handle_factory_request(0x80);
        assert_eq!(ui.mode(), UiMode::Calibration1);
        assert_eq!(ui.handle_factory_request(0xE0), 0);
    }

    #[test]
    fn factory_calibration_sequence() {
        let mut ui = ui();
        let mut frame = InputFrame::released();
        frame.adc[AdcChannel::VOct.index()] = 0.7;
        ui.read_inputs(&frame);
        ui.handle_factory_request(0x81);
        assert_eq!(ui.mode(), UiMode::Calibration2);

        frame.adc[AdcChannel::VOct.index()] = 0.5;
        ui.read_inputs(&frame);
        ui.handle_factory_request(0x82);
        assert_eq!(ui.mode(), UiMode::VuMeter);
        assert!((ui.settings().calibration().pitch_scale - 24.0 / -0.2).abs() < 1e-2);
    }

    #[test]
    fn failed_calibration_panics_and_keeps_stored_values() {
        let mut ui = ui();
        let mut frame = InputFrame::released();
        frame.adc[AdcChannel::VOct.index()] = 0.3;
        ui.read_inputs(&frame);
        ui.set_mode(UiMode::Calibration1);
        ui.on_switch_event(&tap(SwitchId::Write));
        assert_eq!(ui.mode(), UiMode::Calibration2);

        frame.adc[AdcChannel::VOct.index()] = 0.9;
        ui.read_inputs(&frame);
        ui.on_switch_event(&tap(SwitchId::Write));
        assert_eq!(ui.mode(), UiMode::Panic);
        assert_eq!(ui.settings().calibration().pitch_scale, -84.26);
        assert_eq!(ui.cv().calibration(), ui.settings().calibration());
    }
}
