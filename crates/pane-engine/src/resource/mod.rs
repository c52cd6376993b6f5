//! Resource identifiers and the handle registry.
//!
//! Wrapper objects handed to application code (adapters, devices, frame slots) are
//! identified by a [`HandleKey`]. The [`HandleRegistry`] maps those keys to the
//! [`ResourceId`] of the native resource they currently refer to, so the binding can
//! change without replacing the wrapper.

mod id;
mod registry;

pub use id::{ResourceId, ResourceTable};
pub use registry::{Handle, HandleKey, HandleRegistry, RegistryError};
