use winit::dpi::PhysicalSize;

use super::{AcquireFailure, SurfaceConfig, SurfaceError, config};
use crate::resource::ResourceId;

/// Native resources a surface was created against, resolved through the registry once.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceBinding {
    pub device: ResourceId,
    pub adapter: ResourceId,
}

/// Outcome of a native present.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentStatus {
    Good,
    /// Presented, but the surface no longer matches the window exactly.
    Suboptimal,
    Timeout,
    Outdated,
    Lost,
}

impl PresentStatus {
    pub fn is_good(self) -> bool {
        self == PresentStatus::Good
    }

    /// Whether the next frame should be preceded by a configure.
    pub fn needs_reconfigure(self) -> bool {
        matches!(
            self,
            PresentStatus::Suboptimal | PresentStatus::Outdated | PresentStatus::Lost
        )
    }
}

/// Backend half of a surface.
///
/// [`Surface`](super::Surface) owns the state machine and the frame cache; the native
/// side only performs single calls against the platform swapchain.
pub trait NativeSurface {
    /// Texture type handed out for acquired frames.
    type Texture;

    /// Current inner size of the bound window.
    fn window_size(&self) -> PhysicalSize<u32>;

    fn preferred_format(&self) -> wgpu::TextureFormat;

    fn default_alpha_mode(&self) -> wgpu::CompositeAlphaMode;

    fn default_present_mode(&self) -> wgpu::PresentMode {
        config::DEFAULT_PRESENT_MODE
    }

    fn default_frame_latency(&self) -> u32 {
        config::DEFAULT_FRAME_LATENCY
    }

    /// Applies `config`. Any outstanding frames are dropped on success.
    fn configure(
        &mut self,
        binding: &SurfaceBinding,
        config: &SurfaceConfig,
    ) -> Result<(), SurfaceError>;

    fn acquire(&mut self) -> Result<ResourceId, AcquireFailure>;

    fn present(&mut self, id: ResourceId) -> PresentStatus;

    fn texture(&self, id: ResourceId) -> Option<&Self::Texture>;

    fn destroy(&mut self);
}
