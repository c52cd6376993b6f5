use std::fmt;

use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{CursorGrabMode, CursorIcon, UserAttentionType};

use super::{WindowError, WindowIcon};

/// Stable identifier of a window for its whole lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WindowId(u64);

impl WindowId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<winit::window::WindowId> for WindowId {
    fn from(id: winit::window::WindowId) -> Self {
        Self(u64::from(id))
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Native window operations.
///
/// Every call maps to a single synchronous request to the windowing host. Queries read
/// live state; nothing is cached on this side.
pub trait NativeWindow {
    fn id(&self) -> WindowId;

    fn inner_size(&self) -> PhysicalSize<u32>;
    fn outer_size(&self) -> PhysicalSize<u32>;
    fn inner_position(&self) -> Result<PhysicalPosition<i32>, WindowError>;
    fn scale_factor(&self) -> f64;
    fn is_fullscreen(&self) -> bool;
    fn title(&self) -> String;
    /// `None` when the platform cannot report visibility.
    fn is_visible(&self) -> Option<bool>;
    fn is_resizable(&self) -> bool;
    fn is_decorated(&self) -> bool;

    fn set_title(&self, title: &str) -> Result<(), WindowError>;
    fn set_size(&self, size: PhysicalSize<u32>) -> Result<(), WindowError>;
    fn set_min_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError>;
    fn set_max_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError>;
    fn set_position(&self, position: PhysicalPosition<i32>) -> Result<(), WindowError>;
    fn set_visible(&self, visible: bool) -> Result<(), WindowError>;
    fn set_resizable(&self, resizable: bool) -> Result<(), WindowError>;
    fn set_decorations(&self, decorations: bool) -> Result<(), WindowError>;
    fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError>;
    fn set_cursor_grab(&self, mode: CursorGrabMode) -> Result<(), WindowError>;
    fn set_cursor_icon(&self, icon: CursorIcon) -> Result<(), WindowError>;
    fn set_cursor_position(&self, position: PhysicalPosition<f64>) -> Result<(), WindowError>;
    fn set_cursor_visible(&self, visible: bool) -> Result<(), WindowError>;
    fn set_icon(&self, icon: Option<WindowIcon>) -> Result<(), WindowError>;
    fn set_maximized(&self, maximized: bool) -> Result<(), WindowError>;
    fn set_minimized(&self, minimized: bool) -> Result<(), WindowError>;
    fn set_always_on_top(&self, always_on_top: bool) -> Result<(), WindowError>;
    fn request_user_attention(&self, kind: Option<UserAttentionType>) -> Result<(), WindowError>;
}
