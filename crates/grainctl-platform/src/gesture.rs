//! Gesture and combo classification.
//!
//! Runs once per tick after the switch scan and turns debounced edges plus
//! hold durations into [`Event`](crate::Event)s:
//!
//! | Condition | Single switch | Several switches held |
//! |---|---|---|
//! | Pressed, then released | `Released` event | one combo `Released` event, all participants reset |
//! | Held > [`LONG_PRESS_MS`] | `LongPressed` event | one combo `LongPressed` event |
//! | Held > [`VERY_LONG_PRESS_MS`] | `VeryLongPressed` event | one combo `VeryLongPressed` event |
//! | Released after a long press | nothing | nothing |
//!
//! A release that follows a long press has already been reported, so it
//! resets the switch silently.

use crate::{ControlId, EventQueue, QueueError, SwitchId, SwitchState, Switches};

/// Hold duration after which a press becomes a long press (strictly greater).
pub const LONG_PRESS_MS: u32 = 1000;

/// Hold duration after which a long press becomes a very long press.
pub const VERY_LONG_PRESS_MS: u32 = 3000;

/// Stateless per-tick gesture classifier.
///
/// All gesture state lives in the [`Switches`] themselves; the classifier
/// only carries the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureClassifier {
    long_press_ms: u32,
    very_long_press_ms: u32,
}

impl GestureClassifier {
    /// Classifier with the standard thresholds.
    pub const fn new() -> Self {
        Self {
            long_press_ms: LONG_PRESS_MS,
            very_long_press_ms: VERY_LONG_PRESS_MS,
        }
    }

    /// Long-press threshold in milliseconds.
    pub const fn long_press_ms(&self) -> u32 {
        self.long_press_ms
    }

    /// Very-long-press threshold in milliseconds.
    pub const fn very_long_press_ms(&self) -> u32 {
        self.very_long_press_ms
    }

    /// Classifies the current switch edges and hold times, pushing at most
    /// one event per switch.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if an event cannot be queued.
    pub fn classify(
        &self,
        switches: &mut Switches,
        now: u32,
        queue: &mut EventQueue,
    ) -> Result<(), QueueError> {
        for id in SwitchId::ALL {
            let switch = *switches.get(id);
            match switch.state() {
                SwitchState::Released => {
                    if switch.just_pressed() {
                        switches.get_mut(id).capture_press(now);
                    }
                }
                SwitchState::Pressed => {
                    if switch.just_released() {
                        emit(switches, id, now, queue, SwitchState::Released)?;
                    } else if switch.held_for(now) > self.long_press_ms {
                        emit(switches, id, now, queue, SwitchState::LongPressed)?;
                    }
                }
                SwitchState::LongPressed => {
                    if switch.just_released() {
                        switches.get_mut(id).reset();
                    } else if switch.held_for(now) > self.very_long_press_ms {
                        emit(switches, id, now, queue, SwitchState::VeryLongPressed)?;
                    }
                }
                SwitchState::VeryLongPressed => {
                    if switch.just_released() {
                        switches.get_mut(id).reset();
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Emits `gesture` for `id`, or for the whole combo if other switches are
/// engaged, and moves every participant to the matching state.
fn emit(
    switches: &mut Switches,
    id: SwitchId,
    now: u32,
    queue: &mut EventQueue,
    gesture: SwitchState,
) -> Result<(), QueueError> {
    let mask = switches.active_mask() | id.mask();
    let control_id = if mask.count_ones() > 1 {
        ControlId::combo(mask)
    } else {
        ControlId::switch(id)
    };

    switches.for_each_in_mask(mask, |s| {
        if gesture == SwitchState::Released {
            s.reset();
        } else {
            s.set_state(gesture);
        }
    });

    #[cfg(feature = "tracing")]
    tracing::debug!("gesture: {control_id} {} at {now}", gesture.name());

    queue.add_event(control_id, gesture, now)
}
