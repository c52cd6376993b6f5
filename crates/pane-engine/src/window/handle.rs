use raw_window_handle::{HandleError, HasWindowHandle, WindowHandle};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{CursorGrabMode, CursorIcon, UserAttentionType};

use super::{NativeWindow, WindowError, WindowIcon, WindowId};
use crate::event::RedrawSignal;

/// An open window.
///
/// Wraps a native window and the redraw signal for its id. After [`Window::close`]
/// every operation fails with [`WindowError::Closed`].
pub struct Window<W: NativeWindow> {
    id: WindowId,
    native: Option<W>,
    redraw: RedrawSignal,
}

impl<W: NativeWindow> Window<W> {
    pub(crate) fn new(native: W, redraw: RedrawSignal) -> Self {
        debug_assert_eq!(native.id(), redraw.window_id());
        Self {
            id: native.id(),
            native: Some(native),
            redraw,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn is_closed(&self) -> bool {
        self.native.is_none()
    }

    /// Borrows the native window, failing loudly if it was closed.
    pub fn native(&self) -> Result<&W, WindowError> {
        self.native.as_ref().ok_or_else(|| {
            log::error!("{} used after close", self.id);
            WindowError::Closed(self.id)
        })
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Inner size in physical pixels.
    pub fn size(&self) -> Result<PhysicalSize<u32>, WindowError> {
        Ok(self.native()?.inner_size())
    }

    pub fn outer_size(&self) -> Result<PhysicalSize<u32>, WindowError> {
        Ok(self.native()?.outer_size())
    }

    pub fn inner_position(&self) -> Result<PhysicalPosition<i32>, WindowError> {
        self.native()?.inner_position()
    }

    pub fn scale_factor(&self) -> Result<f64, WindowError> {
        Ok(self.native()?.scale_factor())
    }

    pub fn is_fullscreen(&self) -> Result<bool, WindowError> {
        Ok(self.native()?.is_fullscreen())
    }

    pub fn title(&self) -> Result<String, WindowError> {
        Ok(self.native()?.title())
    }

    pub fn is_visible(&self) -> Result<Option<bool>, WindowError> {
        Ok(self.native()?.is_visible())
    }

    pub fn is_resizable(&self) -> Result<bool, WindowError> {
        Ok(self.native()?.is_resizable())
    }

    pub fn is_decorated(&self) -> Result<bool, WindowError> {
        Ok(self.native()?.is_decorated())
    }

    // ── mutators ──────────────────────────────────────────────────────────

    pub fn set_title(&self, title: &str) -> Result<(), WindowError> {
        self.native()?.set_title(title)
    }

    pub fn set_size(&self, width: u32, height: u32) -> Result<(), WindowError> {
        self.native()?.set_size(PhysicalSize::new(width, height))
    }

    pub fn set_min_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.native()?.set_min_size(size)
    }

    pub fn set_max_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.native()?.set_max_size(size)
    }

    pub fn set_position(&self, x: i32, y: i32) -> Result<(), WindowError> {
        self.native()?.set_position(PhysicalPosition::new(x, y))
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.native()?.set_visible(visible)
    }

    pub fn set_resizable(&self, resizable: bool) -> Result<(), WindowError> {
        self.native()?.set_resizable(resizable)
    }

    pub fn set_decorations(&self, decorations: bool) -> Result<(), WindowError> {
        self.native()?.set_decorations(decorations)
    }

    pub fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError> {
        self.native()?.set_fullscreen(fullscreen)
    }

    pub fn set_cursor_grab(&self, mode: CursorGrabMode) -> Result<(), WindowError> {
        self.native()?.set_cursor_grab(mode)
    }

    pub fn set_cursor_icon(&self, icon: CursorIcon) -> Result<(), WindowError> {
        self.native()?.set_cursor_icon(icon)
    }

    pub fn set_cursor_position(&self, x: f64, y: f64) -> Result<(), WindowError> {
        self.native()?.set_cursor_position(PhysicalPosition::new(x, y))
    }

    pub fn set_cursor_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.native()?.set_cursor_visible(visible)
    }

    pub fn set_icon(&self, icon: Option<WindowIcon>) -> Result<(), WindowError> {
        self.native()?.set_icon(icon)
    }

    pub fn set_maximized(&self, maximized: bool) -> Result<(), WindowError> {
        self.native()?.set_maximized(maximized)
    }

    pub fn set_minimized(&self, minimized: bool) -> Result<(), WindowError> {
        self.native()?.set_minimized(minimized)
    }

    pub fn set_always_on_top(&self, always_on_top: bool) -> Result<(), WindowError> {
        self.native()?.set_always_on_top(always_on_top)
    }

    pub fn request_user_attention(
        &self,
        kind: Option<UserAttentionType>,
    ) -> Result<(), WindowError> {
        self.native()?.request_user_attention(kind)
    }

    // ── redraw / lifecycle ────────────────────────────────────────────────

    /// Schedules one `RedrawRequested` for this window.
    ///
    /// Requests made before the pending event is delivered coalesce into it.
    pub fn request_redraw(&self) -> Result<(), WindowError> {
        self.native()?;
        self.redraw.raise();
        Ok(())
    }

    /// Redraw signal for this window, for periodic drivers.
    pub(crate) fn redraw_signal(&self) -> RedrawSignal {
        self.redraw.clone()
    }

    /// Releases the native window.
    pub fn close(&mut self) {
        if self.native.take().is_some() {
            log::debug!("{} closed", self.id);
        }
    }
}

impl<W: NativeWindow + HasWindowHandle> HasWindowHandle for Window<W> {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        match &self.native {
            Some(native) => native.window_handle(),
            None => Err(HandleError::Unavailable),
        }
    }
}

impl<W: NativeWindow> std::fmt::Debug for Window<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
