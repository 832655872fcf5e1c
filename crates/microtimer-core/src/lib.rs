//! MicroTimer core.
//!
//! The tick engine and stopwatch state behind the MicroTimer window. This
//! crate has no windowing dependencies; the app crate owns the event loop
//! and feeds input in through [`input::InputRouter`].

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod state;
pub mod timer;

pub use config::StopwatchConfig;
pub use error::TimerError;
