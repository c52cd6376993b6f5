//! Pane engine crate.
//!
//! Bridges OS windows to wgpu swapchains and delivers window and input events to a
//! cooperative, single-threaded application future.

pub mod device;
pub mod event;
pub mod input;
pub mod logging;
pub mod resource;
pub mod runtime;
pub mod surface;
pub mod time;
pub mod window;
