use std::num::NonZeroU32;

use crate::timer::TimerMode;

const DEFAULT_REFRESH_HZ: NonZeroU32 = match NonZeroU32::new(60) {
    Some(v) => v,
    None => panic!("refresh rate must be non-zero"),
};

/// Stopwatch configuration.
///
/// `period_ms` is both the timer period and the resolution of the elapsed
/// time. `refresh_rate_hz` is the initial UI refresh target used to throttle
/// change notifications; the app replaces it once the monitor rate is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwatchConfig {
    pub period_ms: u32,
    pub mode: TimerMode,
    pub refresh_rate_hz: NonZeroU32,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            period_ms: 1,
            mode: TimerMode::Periodic,
            refresh_rate_hz: DEFAULT_REFRESH_HZ,
        }
    }
}

impl StopwatchConfig {
    pub fn period_ms(mut self, v: u32) -> Self { self.period_ms = v; self }
    pub fn mode(mut self, v: TimerMode) -> Self { self.mode = v; self }
    pub fn refresh_rate_hz(mut self, v: NonZeroU32) -> Self { self.refresh_rate_hz = v; self }
}
