//! Window surfaces (swapchains).
//!
//! [`Surface`] negotiates the pixel format, tracks configuration and hands out the
//! current frame exactly once per present cycle. The platform half is a
//! [`NativeSurface`]: [`WgpuSurface`] on real GPUs, [`HeadlessSurface`] in memory.

mod config;
mod error;
mod frame;
mod handle;
mod headless;
mod native;
mod wgpu;

pub use config::{ConfigureOptions, SurfaceConfig};
pub use error::{AcquireFailure, SurfaceError, SurfaceErrorAction};
pub use frame::FrameTexture;
pub use handle::{Surface, SurfaceState};
pub use headless::{HEADLESS_MAX_DIMENSION, HeadlessSurface, HeadlessTexture};
pub use native::{NativeSurface, PresentStatus, SurfaceBinding};
pub use self::wgpu::WgpuSurface;
