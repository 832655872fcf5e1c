//! Elapsed-time state machine.
//!
//! [`ElapsedTimeState`] consumes ticks from its own [`PeriodicTimer`] on the
//! owner's thread and tells observers when the displayed time goes stale.
//! Formatting is a pure projection ([`DisplayText`]) of elapsed time and the
//! swap flag.
//!
//! [`PeriodicTimer`]: crate::timer::PeriodicTimer

mod elapsed;
mod format;
mod notify;

pub use elapsed::{refresh_interval, ElapsedTimeState, RunState};
pub use format::{format_hms, format_millis, DisplayText};
pub use notify::{Notification, SubscriptionId};
