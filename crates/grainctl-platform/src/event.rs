//! Bounded switch-event queue with an idle clock.

use heapless::Deque;

use crate::{ControlId, ControlType, SwitchState};

/// Maximum number of pending events. The queue is drained every tick and at
/// most one event per switch can be produced per tick.
pub const EVENT_QUEUE_CAPACITY: usize = 16;

/// A classified control gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Kind of control that produced the event.
    pub control_type: ControlType,
    /// Single switch or combo identifier.
    pub control_id: ControlId,
    /// Gesture classification.
    pub data: SwitchState,
    /// Tick at which the event was queued.
    pub timestamp: u32,
}

impl Event {
    /// Creates a switch event.
    pub const fn switch(control_id: ControlId, data: SwitchState, timestamp: u32) -> Self {
        Self {
            control_type: ControlType::Switch,
            control_id,
            data,
            timestamp,
        }
    }
}

/// Error returned when the queue cannot accept another event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// All slots are occupied.
    Full,
}

impl core::fmt::Display for QueueError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            QueueError::Full => write!(f, "event queue full ({EVENT_QUEUE_CAPACITY} events)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for QueueError {}

/// FIFO of pending [`Event`]s plus the time of the last user activity.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: Deque<Event, EVENT_QUEUE_CAPACITY>,
    last_activity: u32,
}

impl EventQueue {
    /// Creates an empty queue whose idle clock starts at tick 0.
    pub const fn new() -> Self {
        Self {
            events: Deque::new(),
            last_activity: 0,
        }
    }

    /// Appends an event and restarts the idle clock at its timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if the queue holds
    /// [`EVENT_QUEUE_CAPACITY`] events already.
    pub fn push(&mut self, event: Event) -> Result<(), QueueError> {
        self.events.push_back(event).map_err(|_| QueueError::Full)?;
        self.last_activity = event.timestamp;
        Ok(())
    }

    /// Convenience for pushing a switch event.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if the queue is full.
    pub fn add_event(
        &mut self,
        control_id: ControlId,
        data: SwitchState,
        now: u32,
    ) -> Result<(), QueueError> {
        self.push(Event::switch(control_id, data, now))
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// Number of pending events.
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every pending event. The idle clock is left as is.
    pub fn flush(&mut self) {
        self.events.clear();
    }

    /// Marks `now` as user activity without queuing anything.
    pub fn touch(&mut self, now: u32) {
        self.last_activity = now;
    }

    /// Milliseconds since the last push or touch.
    #[inline]
    pub fn idle_time(&self, now: u32) -> u32 {
        now.wrapping_sub(self.last_activity)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
