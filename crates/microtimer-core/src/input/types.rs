/// Keyboard keys the stopwatch reacts to.
///
/// Everything else arrives as `Key::Other` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Space,
    R,
    Other(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Press/release state shared by keys and mouse buttons.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ElementState {
    Pressed,
    Released,
}

/// Platform-agnostic input events.
///
/// The app runtime translates window-system events into these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: ElementState,
        /// True when the event is an auto-repeat.
        repeat: bool,
    },

    MouseButton {
        button: MouseButton,
        state: ElementState,
    },

    /// Window focus change.
    Focused(bool),
}
