/// Initialization parameters for the GPU layer.
///
/// Surface-related fields are defaults for surfaces created through
/// [`GpuContext`](super::GpuContext); a `ConfigureOptions` value can still override them
/// per configure.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends the instance may pick from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode used when a configure does not name one. Falls back to FIFO when
    /// the surface does not support it.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference.
    ///
    /// If provided but unsupported on the surface, the first supported mode is used.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency. A hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
