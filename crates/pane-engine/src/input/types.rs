use std::fmt;

use winit::dpi::PhysicalPosition;

/// Keyboard key identifier.
///
/// Platform key codes are mapped into these variants where possible; anything else
/// becomes `Key::Unknown` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "Unknown({code:#x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Wheel delta; `Line` for notched wheels, `Pixel` for touchpads.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f64, y: f64 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyInput {
    pub key: Key,
    /// Platform key code when available.
    pub code: u32,
    pub state: KeyState,
    pub repeat: bool,
    pub modifiers: Modifiers,
    /// Text produced by the key press, if any.
    pub text: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButton {
    pub button: MouseButton,
    pub state: MouseButtonState,
    /// Last known pointer position, in physical pixels.
    pub position: Option<PhysicalPosition<f64>>,
    pub modifiers: Modifiers,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Touch {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: PhysicalPosition<f64>,
}

/// Keyboard, pointer and text input addressed to a window.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key(KeyInput),

    PointerMoved { position: PhysicalPosition<f64> },
    PointerLeft,
    PointerButton(PointerButton),
    MouseWheel {
        delta: MouseWheelDelta,
        phase: TouchPhase,
        modifiers: Modifiers,
    },
    Touch(Touch),

    /// Committed text (IME commit or plain typing).
    Text(String),
}
