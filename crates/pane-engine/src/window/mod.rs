//! Windows.
//!
//! [`Window`] is the application-facing wrapper; [`NativeWindow`] is the seam to the
//! windowing host, implemented by [`WinitWindow`] and by the in-memory
//! [`HeadlessWindow`].

mod error;
mod handle;
mod headless;
mod native;
mod options;
mod winit;

pub use error::WindowError;
pub use handle::Window;
pub use headless::{HeadlessWindow, HeadlessWindowState};
pub use native::{NativeWindow, WindowId};
pub use options::{WindowIcon, WindowOptions};
pub use self::winit::WinitWindow;

pub use ::winit::window::{CursorGrabMode, CursorIcon, UserAttentionType};
