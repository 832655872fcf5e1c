use std::fmt;

/// Errors raised by the periodic timer.
///
/// Only construction and `start` can fail in a way the caller must handle.
/// `Release` is reported from teardown paths so it can be logged; it is never
/// turned into a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A period of zero milliseconds was requested.
    InvalidPeriod { period_ms: u32 },

    /// The platform refused to register the timer callback.
    ///
    /// `code` is the raw platform status when one is available.
    Start { period_ms: u32, code: Option<u32> },

    /// The period cannot change while the timer is running.
    Busy,

    /// The timer was disposed and cannot be restarted.
    Disposed,

    /// The platform failed to release a timer registration.
    Release { reason: String },
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidPeriod { period_ms } => {
                write!(f, "invalid timer period: {period_ms}ms (must be > 0)")
            }
            TimerError::Start { period_ms, code: Some(code) } => {
                write!(f, "unable to start {period_ms}ms timer (platform status {code})")
            }
            TimerError::Start { period_ms, code: None } => {
                write!(f, "unable to start {period_ms}ms timer")
            }
            TimerError::Busy => write!(f, "timer period cannot change while running"),
            TimerError::Disposed => write!(f, "timer has been disposed"),
            TimerError::Release { reason } => write!(f, "failed to release timer: {reason}"),
        }
    }
}

impl std::error::Error for TimerError {}
