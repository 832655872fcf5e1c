use std::cell::Cell;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use microtimer_core::input::InputRouter;
use microtimer_core::state::ElapsedTimeState;

use crate::input::translate_window_event;
use crate::view::window_title;

// Used when the monitor does not report a refresh rate.
const FALLBACK_REFRESH_HZ: NonZeroU32 = match NonZeroU32::new(60) {
    Some(v) => v,
    None => panic!("refresh rate must be non-zero"),
};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "MicroTimer".to_string(),
            initial_size: LogicalSize::new(640.0, 120.0),
        }
    }
}

/// Entry point for the window loop.
pub struct Runtime;

impl Runtime {
    /// Runs the event loop until the window closes. Takes ownership of the
    /// stopwatch and disposes it on the way out.
    pub fn run(config: RuntimeConfig, state: ElapsedTimeState) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut app = AppState::new(config, state);

        event_loop
            .run_app(&mut app)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState {
    config: RuntimeConfig,
    stopwatch: ElapsedTimeState,
    router: InputRouter,

    window: Option<Window>,
    refresh_hz: NonZeroU32,
    frame_interval: Duration,

    // Set by the stopwatch observer, cleared when the title is redrawn.
    stale: Rc<Cell<bool>>,
}

impl AppState {
    fn new(config: RuntimeConfig, mut stopwatch: ElapsedTimeState) -> Self {
        let stale = Rc::new(Cell::new(true));
        let flag = Rc::clone(&stale);
        stopwatch.subscribe(move |_| flag.set(true));

        Self {
            config,
            stopwatch,
            router: InputRouter::new(),
            window: None,
            refresh_hz: FALLBACK_REFRESH_HZ,
            frame_interval: frame_interval(FALLBACK_REFRESH_HZ),
            stale,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        // Keystrokes go straight to the bindings, never to an input method.
        window.set_ime_allowed(false);

        let refresh_hz = window
            .current_monitor()
            .and_then(|m| m.refresh_rate_millihertz())
            .and_then(|mhz| NonZeroU32::new((mhz + 500) / 1000))
            .unwrap_or_else(|| {
                log::info!("monitor refresh rate unavailable, assuming {FALLBACK_REFRESH_HZ}Hz");
                FALLBACK_REFRESH_HZ
            });

        self.refresh_hz = refresh_hz;
        self.frame_interval = frame_interval(refresh_hz);
        self.stopwatch.set_target_refresh_rate(refresh_hz);
        log::info!("display refresh rate {refresh_hz}Hz");

        self.window = Some(window);
        self.stale.set(true);
        Ok(())
    }

    fn present(&mut self) {
        if !self.stale.replace(false) {
            return;
        }
        if let Some(window) = &self.window {
            let title = window_title(&self.config.title, &self.stopwatch.display(), self.refresh_hz);
            window.set_title(&title);
        }
    }

    fn teardown(&mut self) {
        if let Err(e) = self.stopwatch.dispose() {
            log::warn!("failed to dispose stopwatch timer: {e}");
        }
        self.window = None;
    }
}

fn frame_interval(refresh_hz: NonZeroU32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(refresh_hz.get()))
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window(event_loop) {
            log::error!("failed to create initial window: {e:#}");
            self.teardown();
            event_loop.exit();
            return;
        }
        self.present();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.stopwatch.pump();
        self.present();
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + self.frame_interval));
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(ev) = translate_window_event(&event) {
            if let Some(action) = self.router.route(&ev) {
                self.stopwatch.dispatch(action);
                self.present();
            }
        }

        if let WindowEvent::CloseRequested = event {
            self.teardown();
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
