use std::collections::HashSet;

use super::types::{ElementState, InputEvent, Key, MouseButton};

/// Stopwatch actions produced from user input.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    ToggleRunPause,
    Reset,
    SwapDisplay,
}

/// Maps input events to [`Action`]s.
///
/// Bindings:
/// - Space / left button press: toggle run/pause (once per physical press)
/// - R / middle button press: reset
/// - right button release: swap display fields
///
/// Held keys and buttons are tracked so auto-repeat and duplicate press
/// events never toggle twice.
#[derive(Debug, Default)]
pub struct InputRouter {
    keys_down: HashSet<Key>,
    buttons_down: HashSet<MouseButton>,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&mut self, event: &InputEvent) -> Option<Action> {
        match *event {
            InputEvent::Focused(focused) => {
                if !focused {
                    // A release may never arrive once focus is gone.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
                None
            }

            InputEvent::Key { key, state: ElementState::Pressed, repeat } => {
                let first_press = self.keys_down.insert(key) && !repeat;
                match key {
                    Key::Space if first_press => Some(Action::ToggleRunPause),
                    Key::R => Some(Action::Reset),
                    _ => None,
                }
            }

            InputEvent::Key { key, state: ElementState::Released, .. } => {
                self.keys_down.remove(&key);
                None
            }

            InputEvent::MouseButton { button, state: ElementState::Pressed } => {
                let first_press = self.buttons_down.insert(button);
                match button {
                    MouseButton::Left if first_press => Some(Action::ToggleRunPause),
                    MouseButton::Middle => Some(Action::Reset),
                    _ => None,
                }
            }

            InputEvent::MouseButton { button, state: ElementState::Released } => {
                self.buttons_down.remove(&button);
                (button == MouseButton::Right).then_some(Action::SwapDisplay)
            }
        }
    }
}
