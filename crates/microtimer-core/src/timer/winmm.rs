//! Windows multimedia timer (`timeSetEvent`).

use super::source::{TickCallback, TimerCaps, TimerMode, TimerSource};
use crate::error::TimerError;

#[repr(C)]
struct TimeCaps {
    period_min: u32,
    period_max: u32,
}

type TimeProc = unsafe extern "system" fn(u32, u32, usize, usize, usize);

#[link(name = "winmm")]
unsafe extern "system" {
    fn timeSetEvent(delay: u32, resolution: u32, proc_: TimeProc, user: usize, event: u32) -> u32;
    fn timeKillEvent(id: u32) -> u32;
    fn timeGetDevCaps(caps: *mut TimeCaps, size: u32) -> u32;
}

const TIMERR_NOERROR: u32 = 0;
const TIME_ONESHOT: u32 = 0x0000;
const TIME_PERIODIC: u32 = 0x0001;
// timeKillEvent waits for an executing callback before returning.
const TIME_KILL_SYNCHRONOUS: u32 = 0x0100;

#[derive(Debug, Default, Clone, Copy)]
pub struct WinmmSource;

pub struct WinmmRegistration {
    id: u32,
    mode: TimerMode,
    // Address handed to winmm as `dwUser`; must outlive `id`.
    callback: Box<TickCallback>,
}

unsafe extern "system" fn dispatch(_id: u32, _msg: u32, user: usize, _dw1: usize, _dw2: usize) {
    // SAFETY: `user` points at the boxed callback owned by a live
    // `WinmmRegistration`; it is only freed after `timeKillEvent` returns.
    let callback = unsafe { &*(user as *const TickCallback) };
    callback();
}

impl TimerSource for WinmmSource {
    type Registration = WinmmRegistration;

    fn capabilities(&self) -> Option<TimerCaps> {
        let mut caps = TimeCaps { period_min: 0, period_max: 0 };
        let size = std::mem::size_of::<TimeCaps>() as u32;
        // SAFETY: `caps` is a valid, writable TIMECAPS of `size` bytes.
        let status = unsafe { timeGetDevCaps(&mut caps, size) };
        (status == TIMERR_NOERROR).then_some(TimerCaps {
            min_period_ms: caps.period_min,
            max_period_ms: caps.period_max,
        })
    }

    fn register(
        &mut self,
        period_ms: u32,
        mode: TimerMode,
        callback: TickCallback,
    ) -> Result<WinmmRegistration, TimerError> {
        let callback = Box::new(callback);
        let user = &*callback as *const TickCallback as usize;
        let kind = match mode {
            TimerMode::OneShot => TIME_ONESHOT,
            TimerMode::Periodic => TIME_PERIODIC,
        };

        // SAFETY: `dispatch` matches LPTIMECALLBACK and `user` stays valid
        // until the registration is released.
        let id = unsafe {
            timeSetEvent(period_ms, period_ms, dispatch, user, kind | TIME_KILL_SYNCHRONOUS)
        };
        if id == 0 {
            return Err(TimerError::Start { period_ms, code: None });
        }

        Ok(WinmmRegistration { id, mode, callback })
    }

    fn release(&mut self, registration: WinmmRegistration) -> Result<(), TimerError> {
        // SAFETY: `id` came from a successful timeSetEvent.
        let status = unsafe { timeKillEvent(registration.id) };
        drop(registration.callback);

        // An expired one-shot id is already gone; winmm reports that as an error.
        if status != TIMERR_NOERROR && registration.mode == TimerMode::Periodic {
            return Err(TimerError::Release {
                reason: format!("timeKillEvent({}) returned {status}", registration.id),
            });
        }
        Ok(())
    }
}
