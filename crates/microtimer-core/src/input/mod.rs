//! Input routing.
//!
//! Public API is platform-agnostic; the app runtime translates window-system
//! events into [`InputEvent`]s and feeds them to an [`InputRouter`].

mod router;
mod types;

pub use router::{Action, InputRouter};
pub use types::{ElementState, InputEvent, Key, MouseButton};
