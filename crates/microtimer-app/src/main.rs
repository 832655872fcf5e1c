mod input;
mod runtime;
mod view;

use anyhow::{Context, Result};

use microtimer_core::logging::{init_logging, LoggingConfig};
use microtimer_core::state::ElapsedTimeState;
use microtimer_core::StopwatchConfig;

use crate::runtime::{Runtime, RuntimeConfig};

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("microtimer: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = StopwatchConfig::default();
    let stopwatch = ElapsedTimeState::new(&config)
        .with_context(|| format!("failed to start {}ms stopwatch timer", config.period_ms))?;
    log::info!("stopwatch ready: {}ms ticks", config.period_ms);

    Runtime::run(RuntimeConfig::default(), stopwatch)
}
