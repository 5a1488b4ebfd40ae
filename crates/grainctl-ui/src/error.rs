//! Error types for the control loop.

use grainctl_platform::QueueError;
use thiserror::Error;

/// Errors that abort a control-loop tick.
///
/// Everything recoverable (calibration failure, missing presets, persistence
/// failures) is handled inside the loop and never surfaces here.
#[derive(Debug, Error)]
pub enum UiError {
    /// A classified gesture could not be queued; user input would be lost.
    #[error("switch event dropped: {0}")]
    EventQueue(#[from] QueueError),
}
