use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender};

use super::source::{TimerMode, TimerSource};
use super::PlatformSource;
use crate::error::TimerError;

/// Lifecycle notifications published by [`PeriodicTimer`].
///
/// Each variant carries the tick counter: `Started` and `Stopped` the current
/// value, `Running` the value before the tick was counted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimerEvent {
    Started(u64),
    Running(u64),
    Stopped(u64),
}

// ── Shared delivery state ─────────────────────────────────────────────────

struct Fanout {
    armed: bool,
    subscribers: Vec<Sender<TimerEvent>>,
}

impl Fanout {
    fn publish(&mut self, event: TimerEvent) {
        // Subscribers whose receiver is gone are dropped.
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

struct Shared {
    ticks: AtomicU64,
    fanout: Mutex<Fanout>,
}

impl Shared {
    fn fanout(&self) -> MutexGuard<'_, Fanout> {
        self.fanout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Called from the platform timer context.
    fn tick(&self) {
        let mut fanout = self.fanout();
        if !fanout.armed {
            return;
        }
        let before = self.ticks.fetch_add(1, Ordering::Relaxed);
        fanout.publish(TimerEvent::Running(before));
    }
}

// ── PeriodicTimer ─────────────────────────────────────────────────────────

/// High-resolution periodic (or one-shot) timer.
///
/// While running, exactly one registration with the underlying
/// [`TimerSource`] is held. Ticks are published to every subscriber from the
/// source's own execution context; consumers that touch UI-bound state must
/// hand them over to their own thread (see [`PeriodicTimer::subscribe`]).
///
/// Delivery is disarmed under the same lock the tick callback publishes
/// under, so once [`stop`](Self::stop) or [`dispose`](Self::dispose) returns
/// no further `Running` event is published.
pub struct PeriodicTimer<S: TimerSource = PlatformSource> {
    source: S,
    period_ms: u32,
    mode: TimerMode,
    shared: Arc<Shared>,
    registration: Option<S::Registration>,
    disposed: bool,
}

impl PeriodicTimer<PlatformSource> {
    /// Creates a timer on the platform's default timer service.
    pub fn new(period_ms: u32, mode: TimerMode) -> Result<Self, TimerError> {
        Self::with_source(PlatformSource::default(), period_ms, mode)
    }
}

impl<S: TimerSource> PeriodicTimer<S> {
    pub fn with_source(source: S, period_ms: u32, mode: TimerMode) -> Result<Self, TimerError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidPeriod { period_ms });
        }

        match source.capabilities() {
            Some(caps) if !caps.supports(period_ms) => log::warn!(
                "timer period {period_ms}ms outside platform range {}..={}ms",
                caps.min_period_ms,
                caps.max_period_ms
            ),
            Some(caps) => log::debug!(
                "timer caps {}..={}ms, period {period_ms}ms",
                caps.min_period_ms,
                caps.max_period_ms
            ),
            None => log::debug!("timer capabilities unavailable"),
        }

        Ok(Self {
            source,
            period_ms,
            mode,
            shared: Arc::new(Shared {
                ticks: AtomicU64::new(0),
                fanout: Mutex::new(Fanout { armed: false, subscribers: Vec::new() }),
            }),
            registration: None,
            disposed: false,
        })
    }

    /// Returns a receiver for all subsequent timer events.
    ///
    /// The receiver is the cross-thread handoff: `Running` events are sent from
    /// the timer context and drained wherever the receiver lives.
    pub fn subscribe(&self) -> Receiver<TimerEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.shared.fanout().subscribers.push(tx);
        rx
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.disposed {
            return Err(TimerError::Disposed);
        }
        if self.registration.is_some() {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        let registration = self
            .source
            .register(self.period_ms, self.mode, Box::new(move || shared.tick()))?;
        self.registration = Some(registration);

        // Expiries that race ahead of arming are not counted.
        let mut fanout = self.shared.fanout();
        fanout.armed = true;
        let ticks = self.shared.ticks.load(Ordering::Relaxed);
        fanout.publish(TimerEvent::Started(ticks));
        log::debug!("timer started: {}ms {:?} at tick {ticks}", self.period_ms, self.mode);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.registration.is_none() {
            return;
        }
        if let Err(e) = self.release() {
            log::warn!("{e}");
        }

        let ticks = self.ticks();
        self.shared.fanout().publish(TimerEvent::Stopped(ticks));
        log::debug!("timer stopped at tick {ticks}");
    }

    /// Releases any active registration and closes all subscriptions.
    ///
    /// Idempotent. A release failure is returned for the caller to log; the
    /// registration is considered gone either way.
    pub fn dispose(&mut self) -> Result<(), TimerError> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let result = self.release();
        self.shared.fanout().subscribers.clear();
        log::debug!("timer disposed at tick {}", self.ticks());
        result
    }

    /// Changes the period. Only allowed while stopped.
    pub fn set_period(&mut self, period_ms: u32) -> Result<(), TimerError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidPeriod { period_ms });
        }
        if self.is_running() {
            return Err(TimerError::Busy);
        }
        self.period_ms = period_ms;
        Ok(())
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.registration.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Relaxed)
    }

    fn release(&mut self) -> Result<(), TimerError> {
        let Some(registration) = self.registration.take() else {
            return Ok(());
        };
        self.shared.fanout().armed = false;
        self.source.release(registration)
    }
}

impl<S: TimerSource> Drop for PeriodicTimer<S> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            log::warn!("{e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::source::manual::ManualSource;

    fn timer(source: &ManualSource) -> PeriodicTimer<ManualSource> {
        PeriodicTimer::with_source(source.clone(), 1, TimerMode::Periodic).unwrap()
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = PeriodicTimer::with_source(ManualSource::new(), 0, TimerMode::Periodic)
            .err()
            .unwrap();
        assert_eq!(err, TimerError::InvalidPeriod { period_ms: 0 });
    }

    #[test]
    fn start_publishes_started_then_running_ticks() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        let rx = t.subscribe();

        t.start().unwrap();
        source.fire(3);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                TimerEvent::Started(0),
                TimerEvent::Running(0),
                TimerEvent::Running(1),
                TimerEvent::Running(2),
            ]
        );
        assert_eq!(t.ticks(), 3);
        assert!(t.is_running());
    }

    #[test]
    fn start_twice_registers_once() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        t.start().unwrap();
        t.start().unwrap();
        assert_eq!(source.registrations(), 1);
    }

    #[test]
    fn refused_registration_surfaces_start_error() {
        let source = ManualSource::refusing();
        let mut t = timer(&source);
        let rx = t.subscribe();

        let err = t.start().unwrap_err();
        assert!(matches!(err, TimerError::Start { period_ms: 1, .. }));
        assert!(!t.is_running());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn stop_releases_and_reports_final_count() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        let rx = t.subscribe();
        t.start().unwrap();
        source.fire(2);
        t.stop();

        assert!(!source.is_registered());
        assert_eq!(rx.try_iter().last(), Some(TimerEvent::Stopped(2)));

        // Nothing fires once released.
        source.fire(5);
        assert_eq!(t.ticks(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tick_count_survives_restart() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        let rx = t.subscribe();
        t.start().unwrap();
        source.fire(2);
        t.stop();
        t.start().unwrap();
        source.fire(1);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events[events.len() - 2], TimerEvent::Started(2));
        assert_eq!(events[events.len() - 1], TimerEvent::Running(2));
    }

    #[test]
    fn dispose_is_idempotent_and_releases_once() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        let rx = t.subscribe();
        t.start().unwrap();

        t.dispose().unwrap();
        t.dispose().unwrap();
        drop(t);

        assert_eq!(source.releases(), 1);
        // Subscriptions are closed by disposal.
        assert!(matches!(
            rx.try_iter().last(),
            Some(TimerEvent::Started(0))
        ));
        assert!(rx.recv().is_err());
    }

    #[test]
    fn stop_with_failing_release_still_reports_stopped() {
        let source = ManualSource::failing_release();
        let mut t = timer(&source);
        let rx = t.subscribe();
        t.start().unwrap();
        source.fire(3);
        t.stop();

        assert!(!t.is_running());
        assert_eq!(rx.try_iter().last(), Some(TimerEvent::Stopped(3)));
        assert_eq!(source.releases(), 1);

        // Already released; disposal has nothing left to fail on.
        assert!(t.dispose().is_ok());
        assert_eq!(source.releases(), 1);
    }

    #[test]
    fn dispose_with_failing_release_errs_once() {
        let source = ManualSource::failing_release();
        let mut t = timer(&source);
        t.start().unwrap();

        assert!(matches!(t.dispose(), Err(TimerError::Release { .. })));
        assert!(t.dispose().is_ok());
        assert!(!t.is_running());

        // Drop after a failed release does not retry or panic.
        drop(t);
        assert_eq!(source.releases(), 1);
    }

    #[test]
    fn start_after_dispose_fails() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        t.dispose().unwrap();
        assert_eq!(t.start(), Err(TimerError::Disposed));
    }

    #[test]
    fn period_is_locked_while_running() {
        let source = ManualSource::new();
        let mut t = timer(&source);
        t.start().unwrap();
        assert_eq!(t.set_period(5), Err(TimerError::Busy));
        t.stop();
        t.set_period(5).unwrap();
        assert_eq!(t.period_ms(), 5);
        assert_eq!(t.set_period(0), Err(TimerError::InvalidPeriod { period_ms: 0 }));
    }

    #[test]
    fn thread_source_delivers_real_ticks() {
        use std::time::Duration;

        let mut t = PeriodicTimer::with_source(
            crate::timer::ThreadSource,
            1,
            TimerMode::Periodic,
        )
        .unwrap();
        let rx = t.subscribe();
        t.start().unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(TimerEvent::Started(0)));
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(TimerEvent::Running(0)));
        t.stop();

        let stopped_at = t.ticks();
        assert_eq!(rx.try_iter().last(), Some(TimerEvent::Stopped(stopped_at)));
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(t.ticks(), stopped_at);
    }
}
