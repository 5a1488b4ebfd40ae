//! Fixed-rate driver tying a [`PlatformController`] to a [`Ui`].

use grainctl_config::{Settings, SettingsStore};
use grainctl_platform::{LedFrame, PlatformController, TickClock};

use crate::{Processor, Ui, UiError};

/// Runs the UI once per millisecond tick against a hardware (or simulated)
/// controller.
///
/// # Example
///
/// ```rust
/// use grainctl_config::{MemoryStore, Settings};
/// use grainctl_platform::SwitchId;
/// use grainctl_ui::{ControlLoop, EngineState, SimulatedPanel, UiMode};
///
/// let settings = Settings::init(MemoryStore::new());
/// let mut cl = ControlLoop::new(SimulatedPanel::new(), settings, EngineState::new());
/// assert_eq!(cl.ui().mode(), UiMode::Splash);
///
/// cl.controller_mut().set_switch(SwitchId::Freeze, true);
/// cl.run(20).unwrap();
/// cl.controller_mut().set_switch(SwitchId::Freeze, false);
/// cl.run(20).unwrap();
/// assert_eq!(cl.ui().mode(), UiMode::VuMeter);
/// ```
#[derive(Debug)]
pub struct ControlLoop<C: PlatformController, S: SettingsStore, P: Processor> {
    controller: C,
    ui: Ui<S, P>,
    clock: TickClock,
    leds: LedFrame,
}

impl<C: PlatformController, S: SettingsStore, P: Processor> ControlLoop<C, S, P> {
    /// Reads the power-up frame and builds the UI from it.
    pub fn new(mut controller: C, settings: Settings<S>, processor: P) -> Self {
        controller.poll();
        let power_up = controller.read_inputs();
        let ui = Ui::new(settings, processor, &power_up);
        Self {
            controller,
            ui,
            clock: TickClock::new(),
            leds: LedFrame::new(),
        }
    }

    /// Advances one tick: read, process, display.
    ///
    /// # Errors
    ///
    /// Propagates [`UiError`] from the UI; the LEDs are left unchanged.
    pub fn tick(&mut self) -> Result<(), UiError> {
        let now = self.clock.tick();
        self.controller.poll();
        let frame = self.controller.read_inputs();
        self.leds = self.ui.tick(now, &frame)?;
        self.controller.write_leds(&self.leds);
        self.controller.flush();
        Ok(())
    }

    /// Runs `ticks` ticks, stopping at the first error.
    pub fn run(&mut self, ticks: u32) -> Result<(), UiError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Current tick count.
    #[inline]
    pub fn now(&self) -> u32 {
        self.clock.now()
    }

    /// Last rendered LED frame.
    #[inline]
    pub fn leds(&self) -> &LedFrame {
        &self.leds
    }

    /// The UI.
    #[inline]
    pub fn ui(&self) -> &Ui<S, P> {
        &self.ui
    }

    /// Mutable UI access.
    #[inline]
    pub fn ui_mut(&mut self) -> &mut Ui<S, P> {
        &mut self.ui
    }

    /// The controller.
    #[inline]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutable controller access, used to drive a simulated panel.
    #[inline]
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }
}
