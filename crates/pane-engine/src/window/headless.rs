use std::cell::RefCell;
use std::rc::Rc;

use raw_window_handle::{HandleError, HasWindowHandle, WindowHandle};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::window::{CursorGrabMode, CursorIcon, UserAttentionType};

use super::{NativeWindow, WindowError, WindowIcon, WindowId, WindowOptions};

/// Observable state of a [`HeadlessWindow`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindowState {
    pub title: String,
    pub size: PhysicalSize<u32>,
    pub min_size: Option<PhysicalSize<u32>>,
    pub max_size: Option<PhysicalSize<u32>>,
    pub position: PhysicalPosition<i32>,
    pub scale_factor: f64,
    pub visible: bool,
    pub resizable: bool,
    pub decorations: bool,
    pub fullscreen: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub always_on_top: bool,
    pub cursor_grab: CursorGrabMode,
    pub cursor_icon: CursorIcon,
    pub cursor_position: Option<PhysicalPosition<f64>>,
    pub cursor_visible: bool,
    pub icon: Option<WindowIcon>,
    pub attention: Option<UserAttentionType>,
}

/// In-memory window backend.
///
/// Stands in for the OS in headless runs: every mutator updates shared state that
/// queries (and any [`HeadlessSurface`](crate::surface::HeadlessSurface) bound to it)
/// read back. Cloning yields another view of the same window.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    id: WindowId,
    state: Rc<RefCell<HeadlessWindowState>>,
}

impl HeadlessWindow {
    pub fn new(id: WindowId, options: &WindowOptions) -> Self {
        let state = HeadlessWindowState {
            title: options.title.clone(),
            size: options.size(),
            min_size: options.min_size,
            max_size: options.max_size,
            position: PhysicalPosition::new(0, 0),
            scale_factor: 1.0,
            visible: options.visible,
            resizable: options.resizable,
            decorations: options.decorations,
            fullscreen: false,
            maximized: options.maximized,
            minimized: false,
            always_on_top: options.always_on_top,
            cursor_grab: CursorGrabMode::None,
            cursor_icon: CursorIcon::Default,
            cursor_position: None,
            cursor_visible: true,
            icon: None,
            attention: None,
        };
        Self {
            id,
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Number of live views of this window, including this one.
    pub fn view_count(&self) -> usize {
        Rc::strong_count(&self.state)
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> HeadlessWindowState {
        self.state.borrow().clone()
    }

    /// Simulates the host changing the window size (user drag, tiling WM).
    pub fn host_resize(&self, size: PhysicalSize<u32>) {
        self.state.borrow_mut().size = size;
    }

    pub fn set_scale_factor(&self, scale_factor: f64) {
        self.state.borrow_mut().scale_factor = scale_factor;
    }

    fn update(&self, f: impl FnOnce(&mut HeadlessWindowState)) -> Result<(), WindowError> {
        f(&mut self.state.borrow_mut());
        Ok(())
    }
}

fn clamp_size(
    size: PhysicalSize<u32>,
    min: Option<PhysicalSize<u32>>,
    max: Option<PhysicalSize<u32>>,
) -> PhysicalSize<u32> {
    let mut s = size;
    if let Some(min) = min {
        s.width = s.width.max(min.width);
        s.height = s.height.max(min.height);
    }
    if let Some(max) = max {
        s.width = s.width.min(max.width);
        s.height = s.height.min(max.height);
    }
    s
}

impl NativeWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn inner_size(&self) -> PhysicalSize<u32> {
        self.state.borrow().size
    }

    fn outer_size(&self) -> PhysicalSize<u32> {
        let s = self.state.borrow();
        if s.decorations {
            // Nominal title bar.
            PhysicalSize::new(s.size.width, s.size.height + 30)
        } else {
            s.size
        }
    }

    fn inner_position(&self) -> Result<PhysicalPosition<i32>, WindowError> {
        Ok(self.state.borrow().position)
    }

    fn scale_factor(&self) -> f64 {
        self.state.borrow().scale_factor
    }

    fn is_fullscreen(&self) -> bool {
        self.state.borrow().fullscreen
    }

    fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    fn is_visible(&self) -> Option<bool> {
        Some(self.state.borrow().visible)
    }

    fn is_resizable(&self) -> bool {
        self.state.borrow().resizable
    }

    fn is_decorated(&self) -> bool {
        self.state.borrow().decorations
    }

    fn set_title(&self, title: &str) -> Result<(), WindowError> {
        self.update(|s| s.title = title.to_string())
    }

    fn set_size(&self, size: PhysicalSize<u32>) -> Result<(), WindowError> {
        self.update(|s| s.size = clamp_size(size, s.min_size, s.max_size))
    }

    fn set_min_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.update(|s| {
            s.min_size = size;
            s.size = clamp_size(s.size, s.min_size, s.max_size);
        })
    }

    fn set_max_size(&self, size: Option<PhysicalSize<u32>>) -> Result<(), WindowError> {
        self.update(|s| {
            s.max_size = size;
            s.size = clamp_size(s.size, s.min_size, s.max_size);
        })
    }

    fn set_position(&self, position: PhysicalPosition<i32>) -> Result<(), WindowError> {
        self.update(|s| s.position = position)
    }

    fn set_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.update(|s| s.visible = visible)
    }

    fn set_resizable(&self, resizable: bool) -> Result<(), WindowError> {
        self.update(|s| s.resizable = resizable)
    }

    fn set_decorations(&self, decorations: bool) -> Result<(), WindowError> {
        self.update(|s| s.decorations = decorations)
    }

    fn set_fullscreen(&self, fullscreen: bool) -> Result<(), WindowError> {
        self.update(|s| s.fullscreen = fullscreen)
    }

    fn set_cursor_grab(&self, mode: CursorGrabMode) -> Result<(), WindowError> {
        self.update(|s| s.cursor_grab = mode)
    }

    fn set_cursor_icon(&self, icon: CursorIcon) -> Result<(), WindowError> {
        self.update(|s| s.cursor_icon = icon)
    }

    fn set_cursor_position(&self, position: PhysicalPosition<f64>) -> Result<(), WindowError> {
        let size = self.inner_size();
        if position.x < 0.0
            || position.y < 0.0
            || position.x > f64::from(size.width)
            || position.y > f64::from(size.height)
        {
            return Err(WindowError::operation(
                "set_cursor_position",
                "position outside the window",
            ));
        }
        self.update(|s| s.cursor_position = Some(position))
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<(), WindowError> {
        self.update(|s| s.cursor_visible = visible)
    }

    fn set_icon(&self, icon: Option<WindowIcon>) -> Result<(), WindowError> {
        self.update(|s| s.icon = icon)
    }

    fn set_maximized(&self, maximized: bool) -> Result<(), WindowError> {
        self.update(|s| s.maximized = maximized)
    }

    fn set_minimized(&self, minimized: bool) -> Result<(), WindowError> {
        self.update(|s| s.minimized = minimized)
    }

    fn set_always_on_top(&self, always_on_top: bool) -> Result<(), WindowError> {
        self.update(|s| s.always_on_top = always_on_top)
    }

    fn request_user_attention(&self, kind: Option<UserAttentionType>) -> Result<(), WindowError> {
        self.update(|s| s.attention = kind)
    }
}

impl HasWindowHandle for HeadlessWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        Err(HandleError::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> HeadlessWindow {
        HeadlessWindow::new(WindowId::from_raw(1), &WindowOptions::default())
    }

    #[test]
    fn size_respects_min_and_max() {
        let w = window();
        w.set_min_size(Some(PhysicalSize::new(200, 200))).unwrap();
        w.set_max_size(Some(PhysicalSize::new(1000, 700))).unwrap();

        w.set_size(PhysicalSize::new(50, 5000)).unwrap();
        assert_eq!(w.inner_size(), PhysicalSize::new(200, 700));
    }

    #[test]
    fn cursor_position_outside_window_is_rejected() {
        let w = window();
        let err = w
            .set_cursor_position(PhysicalPosition::new(900.0, 10.0))
            .unwrap_err();
        assert!(matches!(
            err,
            WindowError::Operation {
                op: "set_cursor_position",
                ..
            }
        ));
        assert!(w.set_cursor_position(PhysicalPosition::new(10.0, 10.0)).is_ok());
        assert_eq!(
            w.state().cursor_position,
            Some(PhysicalPosition::new(10.0, 10.0))
        );
    }

    #[test]
    fn clones_share_state() {
        let a = window();
        let b = a.clone();
        a.set_visible(false).unwrap();
        assert_eq!(b.is_visible(), Some(false));

        b.host_resize(PhysicalSize::new(10, 20));
        assert_eq!(a.inner_size(), PhysicalSize::new(10, 20));
    }

    #[test]
    fn outer_size_includes_decorations() {
        let w = window();
        assert_eq!(w.outer_size().height, 630);
        w.set_decorations(false).unwrap();
        assert_eq!(w.outer_size(), w.inner_size());
    }
}
