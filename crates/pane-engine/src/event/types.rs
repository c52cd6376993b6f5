use std::path::PathBuf;

use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::input::{InputEvent, KeyState, MouseButtonState, MouseWheelDelta};
use crate::window::WindowId;

/// Why the native loop woke up for a new batch of events.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StartCause {
    Init,
    Poll,
    ResumeTimeReached,
    WaitCancelled,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

/// Events addressed to a single window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    CloseRequested,
    Destroyed,

    /// New inner size in physical pixels. Every resize is delivered; none are coalesced.
    Resized(PhysicalSize<u32>),
    Moved(PhysicalPosition<i32>),

    Focused(bool),
    Occluded(bool),
    ScaleFactorChanged { scale_factor: f64 },
    ThemeChanged(Theme),

    DroppedFile(PathBuf),
    HoveredFile(PathBuf),
    HoveredFileCancelled,

    CursorEntered,

    /// Keyboard, pointer and text input.
    Input(InputEvent),
}

/// Raw device events, not tied to a window.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    Added,
    Removed,
    MouseMotion { dx: f64, dy: f64 },
    MouseWheel(MouseWheelDelta),
    Motion { axis: u32, value: f64 },
    Button { button: u32, state: MouseButtonState },
    Key { code: u32, state: KeyState },
}

/// Everything the event pump delivers.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    NewEvents(StartCause),
    Window { window_id: WindowId, event: WindowEvent },
    Device { device_id: u64, event: DeviceEvent },

    /// A pending redraw for `WindowId`. At most one is queued per window at a time.
    RedrawRequested(WindowId),

    /// The native loop drained its queue and is about to wait.
    MainEventsCleared,

    Suspended,
    Resumed,
    MemoryWarning,
    LoopExiting,
}

impl Event {
    /// Window this event is addressed to, if any.
    pub fn window_id(&self) -> Option<WindowId> {
        match self {
            Event::Window { window_id, .. } => Some(*window_id),
            Event::RedrawRequested(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_close_requested(&self, id: WindowId) -> bool {
        matches!(
            self,
            Event::Window { window_id, event: WindowEvent::CloseRequested } if *window_id == id
        )
    }
}
