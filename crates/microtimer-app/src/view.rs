use std::num::NonZeroU32;

use microtimer_core::state::DisplayText;

const HELP: &str = "Space/LeftClick: Start/Pause - R/MiddleClick: Reset - RightClick: Swap";

/// Window title: the clock first, then refresh info and key help.
pub fn window_title(app: &str, text: &DisplayText, refresh_hz: NonZeroU32) -> String {
    let precision_ms = 1000.0 / f64::from(refresh_hz.get());
    format!(
        "{}  {}  -  {app} - Refresh Rate: {refresh_hz}Hz - Precision {precision_ms:.2}ms - {HELP}",
        text.primary, text.secondary,
    )
}
