//! Cooperative runtime.
//!
//! The application is a single `!Send` future polled by a [`LocalExecutor`]. It suspends
//! only on the event pump and on host calls such as window creation, which the runtime
//! answers between polls. The runtime exits when the future returns, or when it is
//! waiting and nothing (a pending host call, a running [`RedrawDriver`], a
//! [`KeepAlive`] guard) can wake it.
//!
//! [`Runtime`] runs on the winit event loop; [`HeadlessRuntime`] runs a scripted event
//! source with a simulated clock.

mod config;
mod executor;
mod headless;
mod host;
mod scheduler;
mod winit;

pub use config::{DEFAULT_REDRAW_INTERVAL, RuntimeConfig};
pub use executor::{KeepAlive, Liveness, LocalExecutor, Notify, Turn};
pub use headless::{HeadlessRuntime, Outcome};
pub use host::{Host, RedrawDriver};
pub use scheduler::Progress;
pub use self::winit::Runtime;
