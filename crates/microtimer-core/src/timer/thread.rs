use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, Receiver, Sender};

use super::source::{TickCallback, TimerCaps, TimerMode, TimerSource};
use crate::error::TimerError;

/// Timer service backed by one dedicated thread per registration.
///
/// Expiries are scheduled against absolute deadlines (`start + n * period`),
/// so a late wakeup is followed by immediate catch-up ticks instead of
/// accumulating drift.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSource;

pub struct ThreadRegistration {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl TimerSource for ThreadSource {
    type Registration = ThreadRegistration;

    fn capabilities(&self) -> Option<TimerCaps> {
        Some(TimerCaps { min_period_ms: 1, max_period_ms: u32::MAX })
    }

    fn register(
        &mut self,
        period_ms: u32,
        mode: TimerMode,
        callback: TickCallback,
    ) -> Result<ThreadRegistration, TimerError> {
        // Nothing is ever sent; dropping the sender is the shutdown signal.
        let (shutdown, signal) = crossbeam_channel::bounded::<()>(0);
        let period = Duration::from_millis(u64::from(period_ms));

        let handle = thread::Builder::new()
            .name("microtimer-tick".to_string())
            .spawn(move || run(signal, period, mode, callback))
            .map_err(|e| {
                log::error!("failed to spawn tick thread: {e}");
                TimerError::Start { period_ms, code: e.raw_os_error().map(|c| c as u32) }
            })?;

        Ok(ThreadRegistration { shutdown, handle })
    }

    fn release(&mut self, registration: ThreadRegistration) -> Result<(), TimerError> {
        let ThreadRegistration { shutdown, handle } = registration;
        drop(shutdown);
        handle.join().map_err(|_| TimerError::Release {
            reason: "tick thread panicked".to_string(),
        })
    }
}

fn run(signal: Receiver<()>, period: Duration, mode: TimerMode, callback: TickCallback) {
    let mut deadline = Instant::now() + period;
    loop {
        match signal.recv_deadline(deadline) {
            Err(RecvTimeoutError::Timeout) => {
                callback();
                if mode == TimerMode::OneShot {
                    return;
                }
                deadline += period;
            }
            // Disconnected: the registration was released.
            _ => return,
        }
    }
}
