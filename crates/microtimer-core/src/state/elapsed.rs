use std::num::NonZeroU32;
use std::time::Duration;

use crossbeam_channel::Receiver;

use super::format::DisplayText;
use super::notify::{Notification, Observers, SubscriptionId};
use crate::config::StopwatchConfig;
use crate::error::TimerError;
use crate::input::Action;
use crate::timer::{PeriodicTimer, PlatformSource, TimerEvent, TimerSource};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Paused,
    Running,
}

/// Number of ticks to skip between notifications for a UI refresh target.
///
/// `round(1000 / rate_hz / period_ms) - 1`, rounding halves up, clamped at
/// zero (zero means every tick notifies).
pub fn refresh_interval(rate_hz: NonZeroU32, period_ms: u32) -> u32 {
    // u32 * u32 fits in u64; adding half the divisor cannot overflow either.
    let divisor = u64::from(rate_hz.get()) * u64::from(period_ms.max(1));
    let ticks_per_refresh = (1000 + divisor / 2) / divisor;
    ticks_per_refresh.saturating_sub(1) as u32
}

/// Stopwatch state: elapsed time, run state and swap flag.
///
/// Owns its [`PeriodicTimer`]. The timer publishes ticks from its own
/// context into a channel; [`pump`](Self::pump) drains it on the owner's
/// thread, so every mutation happens on one thread.
pub struct ElapsedTimeState<S: TimerSource = PlatformSource> {
    timer: PeriodicTimer<S>,
    events: Receiver<TimerEvent>,

    period: Duration,
    elapsed: Duration,
    run_state: RunState,
    swapped: bool,

    throttle: u32,
    refresh_interval: u32,

    observers: Observers,
    disposed: bool,
}

impl ElapsedTimeState<PlatformSource> {
    pub fn new(config: &StopwatchConfig) -> Result<Self, TimerError> {
        Self::with_source(PlatformSource::default(), config)
    }
}

impl<S: TimerSource> ElapsedTimeState<S> {
    /// Creates the state and starts its timer.
    pub fn with_source(source: S, config: &StopwatchConfig) -> Result<Self, TimerError> {
        let mut timer = PeriodicTimer::with_source(source, config.period_ms, config.mode)?;
        let events = timer.subscribe();
        timer.start()?;

        Ok(Self {
            timer,
            events,
            period: Duration::from_millis(u64::from(config.period_ms)),
            elapsed: Duration::ZERO,
            run_state: RunState::Stopped,
            swapped: false,
            throttle: 0,
            refresh_interval: refresh_interval(config.refresh_rate_hz, config.period_ms),
            observers: Observers::default(),
            disposed: false,
        })
    }

    // ── Observers ─────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, f: impl FnMut(Notification) + 'static) -> SubscriptionId {
        self.observers.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ── Actions ───────────────────────────────────────────────────────────

    pub fn dispatch(&mut self, action: Action) {
        log::debug!("{action:?} in {:?}", self.run_state);
        match action {
            Action::ToggleRunPause => self.toggle_run_pause(),
            Action::Reset => self.reset(),
            Action::SwapDisplay => self.swap_display(),
        }
    }

    /// Stopped/Paused -> Running, Running -> Paused.
    ///
    /// Notifies immediately so the display reflects the action without
    /// waiting for the next throttled tick.
    pub fn toggle_run_pause(&mut self) {
        self.run_state = match self.run_state {
            RunState::Stopped | RunState::Paused => RunState::Running,
            RunState::Running => RunState::Paused,
        };
        self.throttle = 0;
        self.observers.notify(Notification::ElapsedChanged);
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.run_state = RunState::Stopped;
        self.throttle = 0;
        self.observers.notify(Notification::ElapsedChanged);
    }

    pub fn swap_display(&mut self) {
        self.swapped = !self.swapped;
        self.observers.notify(Notification::DisplayTextChanged);
    }

    pub fn set_target_refresh_rate(&mut self, rate_hz: NonZeroU32) {
        let period_ms = self.timer.period_ms();
        self.refresh_interval = refresh_interval(rate_hz, period_ms);
        log::debug!(
            "refresh target {rate_hz}Hz at {period_ms}ms ticks: notify every {} tick(s)",
            self.refresh_interval + 1
        );
    }

    // ── Ticks ─────────────────────────────────────────────────────────────

    /// Applies one timer period.
    ///
    /// Ignored unless running, and always ignored after [`dispose`](Self::dispose).
    pub fn on_tick(&mut self) {
        self.apply_tick();
    }

    fn apply_tick(&mut self) -> bool {
        if self.disposed || self.run_state != RunState::Running {
            return false;
        }

        self.elapsed += self.period;

        if self.throttle >= self.refresh_interval {
            self.throttle = 0;
            self.observers.notify(Notification::ElapsedChanged);
        } else {
            self.throttle += 1;
        }
        true
    }

    /// Drains timer events queued since the last call.
    ///
    /// Returns the number of ticks applied. Ticks that arrive outside the
    /// Running state are drained without effect and not counted.
    pub fn pump(&mut self) -> usize {
        if self.disposed {
            return 0;
        }

        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            match event {
                TimerEvent::Running(_) => {
                    if self.apply_tick() {
                        applied += 1;
                    }
                }
                TimerEvent::Started(ticks) => log::trace!("timer started at tick {ticks}"),
                TimerEvent::Stopped(ticks) => log::trace!("timer stopped at tick {ticks}"),
            }
        }
        applied
    }

    /// Disposes the timer and discards pending ticks. Idempotent.
    pub fn dispose(&mut self) -> Result<(), TimerError> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let result = self.timer.dispose();
        let discarded = self.events.try_iter().count();
        log::debug!("stopwatch disposed, {discarded} pending event(s) discarded");
        result
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_swapped(&self) -> bool {
        self.swapped
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn refresh_interval(&self) -> u32 {
        self.refresh_interval
    }

    pub fn display(&self) -> DisplayText {
        DisplayText::new(self.elapsed, self.swapped)
    }
}
