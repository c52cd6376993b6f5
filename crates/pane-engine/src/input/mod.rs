//! Input subsystem.
//!
//! Input events are platform-agnostic; [`platform`] translates native events into them
//! and into the window/device events of [`crate::event`].

pub mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{
    InputEvent,
    Key,
    KeyInput,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButton,
    Touch,
    TouchPhase,
};
