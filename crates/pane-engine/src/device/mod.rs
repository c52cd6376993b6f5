//! GPU device management.
//!
//! Creates the wgpu instance, adapter, device and queue, registers the adapter and
//! device in the handle registry and creates wgpu-backed surfaces for winit windows.

mod context;
mod init;

pub use context::{GpuAdapter, GpuContext, GpuDevice};
pub use init::GpuInit;
