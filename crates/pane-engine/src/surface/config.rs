use winit::dpi::PhysicalSize;

/// Defaults applied when [`ConfigureOptions`] leaves a field unset.
pub const DEFAULT_USAGE: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT;
pub const DEFAULT_PRESENT_MODE: wgpu::PresentMode = wgpu::PresentMode::Fifo;
pub const DEFAULT_FRAME_LATENCY: u32 = 2;

/// Arguments to [`Surface::configure`](super::Surface::configure).
///
/// Unset fields fall back to the native preferred format, the bound window's current
/// size, render-attachment usage, FIFO presentation and the first supported alpha mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureOptions {
    pub format: Option<wgpu::TextureFormat>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub usage: Option<wgpu::TextureUsages>,
    pub present_mode: Option<wgpu::PresentMode>,
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,
    pub view_formats: Vec<wgpu::TextureFormat>,
    pub desired_maximum_frame_latency: Option<u32>,
}

impl ConfigureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_present_mode(mut self, present_mode: wgpu::PresentMode) -> Self {
        self.present_mode = Some(present_mode);
        self
    }

    pub fn with_alpha_mode(mut self, alpha_mode: wgpu::CompositeAlphaMode) -> Self {
        self.alpha_mode = Some(alpha_mode);
        self
    }

    pub fn with_view_formats(mut self, view_formats: Vec<wgpu::TextureFormat>) -> Self {
        self.view_formats = view_formats;
        self
    }

    pub fn with_frame_latency(mut self, frames: u32) -> Self {
        self.desired_maximum_frame_latency = Some(frames);
        self
    }
}

impl From<&SurfaceConfig> for ConfigureOptions {
    fn from(config: &SurfaceConfig) -> Self {
        Self {
            format: Some(config.format),
            width: Some(config.width),
            height: Some(config.height),
            usage: Some(config.usage),
            present_mode: Some(config.present_mode),
            alpha_mode: Some(config.alpha_mode),
            view_formats: config.view_formats.clone(),
            desired_maximum_frame_latency: Some(config.desired_maximum_frame_latency),
        }
    }
}

/// A fully resolved surface configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    pub usage: wgpu::TextureUsages,
    pub present_mode: wgpu::PresentMode,
    pub alpha_mode: wgpu::CompositeAlphaMode,
    pub view_formats: Vec<wgpu::TextureFormat>,
    pub desired_maximum_frame_latency: u32,
}

impl SurfaceConfig {
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }

    pub(crate) fn to_wgpu(&self) -> wgpu::SurfaceConfiguration {
        wgpu::SurfaceConfiguration {
            usage: self.usage,
            format: self.format,
            width: self.width,
            height: self.height,
            present_mode: self.present_mode,
            alpha_mode: self.alpha_mode,
            view_formats: self.view_formats.clone(),
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        }
    }
}

/// Picks the surface format, preferring sRGB variants when asked to.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

/// Uses `requested` if supported, otherwise the first supported alpha mode.
pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn srgb_is_preferred_when_available() {
        let formats = [TextureFormat::Rgba8Unorm, TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            choose_surface_format(&formats, true),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(
            choose_surface_format(&formats, false),
            Some(TextureFormat::Rgba8Unorm)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn unsupported_alpha_request_falls_back_to_first() {
        let supported = [CompositeAlphaMode::Opaque, CompositeAlphaMode::PreMultiplied];
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PostMultiplied)),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(
            choose_alpha_mode(&supported, Some(CompositeAlphaMode::PreMultiplied)),
            CompositeAlphaMode::PreMultiplied
        );
        assert_eq!(choose_alpha_mode(&[], None), CompositeAlphaMode::Auto);
    }

    #[test]
    fn options_from_config_round_trip_the_resolved_values() {
        let config = SurfaceConfig {
            format: TextureFormat::Bgra8UnormSrgb,
            width: 320,
            height: 200,
            usage: DEFAULT_USAGE,
            present_mode: DEFAULT_PRESENT_MODE,
            alpha_mode: CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: DEFAULT_FRAME_LATENCY,
        };
        let options = ConfigureOptions::from(&config).with_size(640, 400);
        assert_eq!(options.format, Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!((options.width, options.height), (Some(640), Some(400)));
    }
}
