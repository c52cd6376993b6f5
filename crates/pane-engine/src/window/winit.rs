use std::sync::Arc;

use raw_window_handle::{HandleError, HasWindowHandle, WindowHandle};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::ActiveEventLoop;
use winit::window::{
    CursorGrabMode, CursorIcon, Fullscreen, Icon, UserAttentionType, WindowLevel,
};

use super::{NativeWindow, WindowError, WindowIcon, WindowId, WindowOptions};

/// Native window backed by winit.
///
/// The winit window is held in an `Arc` so a wgpu surface can borrow it for `'static`.
#[derive(Debug, Clone)]
pub struct WinitWindow {
    inner: Arc<winit::window::Window>,
}

impl WinitWindow {
    /// Creates a window on the running event loop.
    pub(crate) fn create(
        event_loop: &ActiveEventLoop,
        options: &WindowOptions,
    ) -> Result<Self, WindowError> {
        let mut attrs = winit::window::Window::default_attributes()
            .with_title(options.title.clone())
            .with_inner_size(options.size())
            .with_resizable(options.resizable)
            .with_visible(options.visible)
            .with_decorations(options.decorations)
            .with_maximized(options.maximized)
            .with_transparent(options.transparent);

        if options.always_on_top {
            attrs = attrs.with_window_level(WindowLevel::AlwaysOnTop);
        }
        if let Some(min) = options.min_size {
            attrs = attrs.with_min_inner_size(min);
        }
        if let Some(max) = options.max_size {
            attrs = attrs.with_max_inner_size(max);
        }

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| WindowError::Creation(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(window),
        })
    }

    /// Shared winit window, e.g. for `wgpu::Instance::create_surface`.
    pub fn winit(&self) -> &Arc<winit::window::Window> {
        &self.inner
    }
}

impl NativeWindow for WinitWindow {
    fn id(&self) -> WindowId {
        self.inner.id().into()
    }

    fn inner_size(&self) -> PhysicalSize<u32> {
        self.inner.inner_size()
    }

    fn outer_size(&self) -> PhysicalSize<u32> {
        self.inner.outer_size()
    }

    fn inner_position(&self) -> Result<PhysicalPosition<i32>, WindowError> {
        self.inner
            .inner_position()
            .map_err(|e| WindowError::operation("inner_position", e))
    }

    fn scale_factor(&self) -> f64 {
        self.inner.scale_factor()
    }

    fn is_fullscreen(&self) -> bool {
        self.inner.fullscreen().is_some()
    }

    fn title(&self) -> String {
        self.inner.title()
    }

    fn is_visible(&self) -> Option<bool> {
        self.inner.is_visible()
    }

    fn is_resizable(&self) -> bool {
        self.inner.is_resizable()
    }

    fn is_decorated(&self) -> bool {
        self.inner.is_decorated()
    }

    fn set_title(&self, title: &str) -> Result<(), WindowError> {
        self.inner.set_title(title);
        Ok(())
    }

    fn set_size(&self, size: PhysicalSize<u32>) -> Result<(), WindowError> {
        // `None` means the resize is asynchronous; a `Resized` event follows.
        if let Some(applied) = self.inner.request_inner_size(size) {
            log::trace!("window resized synchronously to {applied:?}");
        }
        Ok(())
    }

    fn set_min_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.inner.set_min_inner_size(size);
        Ok(())
    }

    fn set_max_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.inner.set_max_inner_size(size);
        Ok(())
    }

    fn set_position(&self, position: PhysicalPosition<i32>) -> Result<(), WindowError> {
        self.inner.set_outer_position(position);
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.inner.set_visible(visible);
        Ok(())
    }

    fn set_resizable(&self, resizable: bool) -> Result<(), WindowError> {
        self.inner.set_resizable(resizable);
        Ok(())
    }

    fn set_decorations(&self, decorations: bool) -> Result<(), WindowError> {
        self.inner.set_decorations(decorations);
        Ok(())
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError> {
        self.inner
            .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn set_cursor_grab(&self, mode: CursorGrabMode) -> Result<(), WindowError> {
        self.inner
            .set_cursor_grab(mode)
            .map_err(|e| WindowError::operation("set_cursor_grab", e))
    }

    fn set_cursor_icon(&self, icon: CursorIcon) -> Result<(), WindowError> {
        self.inner.set_cursor(icon);
        Ok(())
    }

    fn set_cursor_position(&self, position: PhysicalPosition<f64>) -> Result<(), WindowError> {
        self.inner
            .set_cursor_position(position)
            .map_err(|e| WindowError::operation("set_cursor_position", e))
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.inner.set_cursor_visible(visible);
        Ok(())
    }

    fn set_icon(&self, icon: Option<WindowIcon>) -> Result<(), WindowError> {
        let icon = match icon {
            Some(icon) => {
                let (rgba, width, height) = icon.into_parts();
                Some(
                    Icon::from_rgba(rgba, width, height)
                        .map_err(|e| WindowError::operation("set_icon", e))?,
                )
            }
            None => None,
        };
        self.inner.set_window_icon(icon);
        Ok(())
    }

    fn set_maximized(&self, maximized: bool) -> Result<(), WindowError> {
        self.inner.set_maximized(maximized);
        Ok(())
    }

    fn set_minimized(&self, minimized: bool) -> Result<(), WindowError> {
        self.inner.set_minimized(minimized);
        Ok(())
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<(), WindowError> {
        let level = if always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.inner.set_window_level(level);
        Ok(())
    }

    fn request_user_attention(&self, kind: Option<UserAttentionType>) -> Result<(), WindowError> {
        self.inner.request_user_attention(kind);
        Ok(())
    }
}

impl HasWindowHandle for WinitWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        self.inner.window_handle()
    }
}
