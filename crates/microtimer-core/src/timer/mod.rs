//! Periodic tick engine.
//!
//! [`PeriodicTimer`] owns the start/stop/dispose lifecycle and the tick
//! counter. The platform timer service sits behind [`TimerSource`]:
//! - Windows: the winmm multimedia timer (`timeSetEvent`)
//! - elsewhere: a dedicated deadline-scheduled thread

mod periodic;
mod source;
mod thread;
#[cfg(windows)]
mod winmm;

pub use periodic::{PeriodicTimer, TimerEvent};
pub use source::{TickCallback, TimerCaps, TimerMode, TimerSource};
pub use thread::{ThreadRegistration, ThreadSource};
#[cfg(windows)]
pub use winmm::{WinmmRegistration, WinmmSource};

#[cfg(test)]
pub(crate) use source::manual;

/// Timer service used by [`PeriodicTimer::new`].
#[cfg(windows)]
pub type PlatformSource = WinmmSource;

/// Timer service used by [`PeriodicTimer::new`].
#[cfg(not(windows))]
pub type PlatformSource = ThreadSource;
