use crate::error::TimerError;

/// Callback invoked by a platform timer once per expiry.
///
/// Runs on the platform's timer context, never on the thread that registered it.
pub type TickCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Whether a registration fires once or repeatedly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TimerMode {
    OneShot,
    #[default]
    Periodic,
}

/// Period bounds reported by the platform, in milliseconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimerCaps {
    pub min_period_ms: u32,
    pub max_period_ms: u32,
}

impl TimerCaps {
    pub fn supports(&self, period_ms: u32) -> bool {
        (self.min_period_ms..=self.max_period_ms).contains(&period_ms)
    }
}

/// Platform timer service.
///
/// A source hands out registrations: each one delivers `callback` at the
/// requested period until it is passed back to [`TimerSource::release`].
/// `release` must not return while a callback is still executing.
pub trait TimerSource {
    type Registration;

    /// Best-effort capability query. `None` means the platform did not answer.
    fn capabilities(&self) -> Option<TimerCaps>;

    fn register(
        &mut self,
        period_ms: u32,
        mode: TimerMode,
        callback: TickCallback,
    ) -> Result<Self::Registration, TimerError>;

    fn release(&mut self, registration: Self::Registration) -> Result<(), TimerError>;
}
