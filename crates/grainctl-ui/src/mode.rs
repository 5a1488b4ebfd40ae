//! The UI mode state machine as pure transition functions.
//!
//! [`on_switch_event`] and [`on_idle`] decide the next mode and the single
//! side effect, if any, for one input. They never touch the engine or the
//! store; [`Ui`](crate::Ui) executes the returned [`Command`].
//!
//! Only `Released` and `LongPressed` gestures are actionable. `Pressed` only
//! starts timing, and `VeryLongPressed` follows a `LongPressed` from the same
//! hold that was already handled, so both leave every mode unchanged.

use grainctl_platform::{ControlId, Event, SwitchId, SwitchState};

/// Idle time after which Panic clears.
pub const PANIC_TIMEOUT_MS: u32 = 1000;

/// Idle time after which Quality, Playback-Mode and Splash revert.
pub const MENU_TIMEOUT_MS: u32 = 3000;

/// Idle time after which Load and Save revert.
pub const BROWSE_TIMEOUT_MS: u32 = 6000;

/// Active UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiMode {
    /// Startup animation.
    Splash,
    /// Default mode: output level bar.
    VuMeter,
    /// Quality selection.
    Quality,
    /// Algorithm selection.
    PlaybackMode,
    /// Preset browsing for recall.
    Load,
    /// Preset browsing for storage.
    Save,
    /// Preset export in progress; input ignored.
    Saving,
    /// Calibration, waiting for the C1 reference.
    Calibration1,
    /// Calibration, waiting for the C3 reference.
    Calibration2,
    /// Calibration failed.
    Panic,
}

impl UiMode {
    /// Lowercase name for logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            UiMode::Splash => "splash",
            UiMode::VuMeter => "vu_meter",
            UiMode::Quality => "quality",
            UiMode::PlaybackMode => "playback_mode",
            UiMode::Load => "load",
            UiMode::Save => "save",
            UiMode::Saving => "saving",
            UiMode::Calibration1 => "calibration_1",
            UiMode::Calibration2 => "calibration_2",
            UiMode::Panic => "panic",
        }
    }
}

impl std::fmt::Display for UiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Flip the engine bypass.
    ToggleBypass,
    /// Hold the reverb tail until BYPASS is let go.
    SetInfiniteReverb,
    /// Flip buffer freeze.
    ToggleFreeze,
    /// Flip reverse playback.
    ToggleReverse,
    /// Next quality level, persisted.
    IncrementQuality,
    /// Next playback mode, persisted.
    IncrementPlaybackMode,
    /// Previous playback mode, persisted.
    DecrementPlaybackMode,
    /// Recall the preset at the cursor, then advance the cursor.
    LoadPreset,
    /// Store the engine state at the cursor, persist, then advance the cursor.
    SavePreset,
    /// Advance the preset cursor.
    AdvanceCursor,
    /// Capture the C1 reference and channel offsets.
    CalibrateC1,
    /// Capture C3 and solve; the executor picks VU-Meter or Panic.
    CalibrateC3,
}

/// Outcome of one switch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode after the event.
    pub mode: UiMode,
    /// Side effect to execute, if any.
    pub command: Option<Command>,
}

impl Transition {
    /// Stay in `mode` with no side effect.
    pub const fn stay(mode: UiMode) -> Self {
        Self {
            mode,
            command: None,
        }
    }

    /// Move to `mode` with no side effect.
    pub const fn to(mode: UiMode) -> Self {
        Self::stay(mode)
    }

    /// Move to `mode` and run `command`.
    pub const fn with(mode: UiMode, command: Command) -> Self {
        Self {
            mode,
            command: Some(command),
        }
    }
}

/// Outcome of an idle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAction {
    /// No timeout fired.
    Stay,
    /// Restart the idle clock and switch to the given mode.
    Touch(UiMode),
}

/// Which front-panel control an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Switch(SwitchId),
    FreezeBypass,
    OtherCombo,
}

fn control(id: ControlId) -> Control {
    if let Some(switch) = id.as_switch() {
        Control::Switch(switch)
    } else if id == ControlId::COMBO_FREEZE_BYPASS {
        Control::FreezeBypass
    } else {
        Control::OtherCombo
    }
}

/// Decides the next mode and side effect for one switch event.
///
/// # Example
///
/// ```rust
/// use grainctl_platform::{ControlId, Event, SwitchId, SwitchState};
/// use grainctl_ui::{Command, UiMode, on_switch_event};
///
/// let tap = Event::switch(ControlId::switch(SwitchId::Bypass), SwitchState::Released, 0);
/// let t = on_switch_event(UiMode::VuMeter, &tap);
/// assert_eq!(t.mode, UiMode::VuMeter);
/// assert_eq!(t.command, Some(Command::ToggleBypass));
/// ```
pub fn on_switch_event(mode: UiMode, event: &Event) -> Transition {
    use Command as C;
    use SwitchId::{Bypass, Freeze, Mode, Write};
    use SwitchState::{LongPressed as Long, Released as Tap};

    let gesture = event.data;
    if matches!(gesture, SwitchState::Pressed | SwitchState::VeryLongPressed) {
        return Transition::stay(mode);
    }
    let control = control(event.control_id);

    match mode {
        UiMode::Splash => Transition::to(UiMode::VuMeter),

        UiMode::Panic | UiMode::Saving => Transition::stay(mode),

        UiMode::VuMeter => match (control, gesture) {
            (Control::Switch(Mode), Long) => Transition::to(UiMode::Load),
            (Control::Switch(Mode), Tap) => Transition::to(UiMode::Quality),
            (Control::Switch(Write), Long) => Transition::to(UiMode::Save),
            (Control::Switch(Write), Tap) => Transition::to(UiMode::PlaybackMode),
            (Control::Switch(Bypass), Long) => Transition::with(mode, C::SetInfiniteReverb),
            (Control::Switch(Bypass), Tap) => Transition::with(mode, C::ToggleBypass),
            (Control::Switch(Freeze), Long) => Transition::with(mode, C::ToggleReverse),
            (Control::Switch(Freeze), Tap) => Transition::with(mode, C::ToggleFreeze),
            (Control::FreezeBypass, Long) => Transition::to(UiMode::Load),
            _ => Transition::stay(mode),
        },

        UiMode::Quality => match (control, gesture) {
            (Control::Switch(Mode), Tap) => Transition::with(mode, C::IncrementQuality),
            (Control::Switch(Mode), _) => Transition::stay(mode),
            _ => Transition::to(UiMode::VuMeter),
        },

        UiMode::PlaybackMode => match control {
            Control::Switch(Mode) => Transition::with(mode, C::DecrementPlaybackMode),
            Control::Switch(Write) => Transition::with(mode, C::IncrementPlaybackMode),
            _ => Transition::to(UiMode::VuMeter),
        },

        UiMode::Load => match (control, gesture) {
            (Control::Switch(Mode | Freeze), Long) => {
                Transition::with(UiMode::VuMeter, C::LoadPreset)
            }
            (Control::Switch(Mode | Freeze), Tap) => Transition::with(mode, C::AdvanceCursor),
            (Control::Switch(Mode | Freeze), _) => Transition::stay(mode),
            _ => Transition::to(UiMode::VuMeter),
        },

        UiMode::Save => match (control, gesture) {
            (Control::Switch(Write), Long) => Transition::with(UiMode::VuMeter, C::SavePreset),
            (Control::Switch(Write), Tap) => Transition::with(mode, C::AdvanceCursor),
            (Control::Switch(Write), _) => Transition::stay(mode),
            _ => Transition::to(UiMode::VuMeter),
        },

        UiMode::Calibration1 => match control {
            Control::Switch(Write) => Transition::with(UiMode::Calibration2, C::CalibrateC1),
            _ => Transition::to(UiMode::VuMeter),
        },

        UiMode::Calibration2 => match control {
            Control::Switch(Write) => Transition::with(UiMode::VuMeter, C::CalibrateC3),
            _ => Transition::to(UiMode::VuMeter),
        },
    }
}

/// Applies the idle-timeout policy for `mode` after `idle_ms` without input.
///
/// At most one rule fires per call, since every firing restarts the idle
/// clock. Thresholds are strict: a mode reverts one tick after its timeout.
pub fn on_idle(mode: UiMode, idle_ms: u32) -> IdleAction {
    match mode {
        UiMode::Panic if idle_ms > PANIC_TIMEOUT_MS => IdleAction::Touch(UiMode::VuMeter),
        UiMode::Quality | UiMode::PlaybackMode | UiMode::Splash if idle_ms > MENU_TIMEOUT_MS => {
            IdleAction::Touch(UiMode::VuMeter)
        }
        UiMode::Save | UiMode::Load if idle_ms > BROWSE_TIMEOUT_MS => {
            IdleAction::Touch(UiMode::VuMeter)
        }
        _ if idle_ms > BROWSE_TIMEOUT_MS => IdleAction::Touch(mode),
        _ => IdleAction::Stay,
    }
}
