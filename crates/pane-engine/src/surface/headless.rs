use std::collections::VecDeque;

use winit::dpi::PhysicalSize;

use super::{AcquireFailure, NativeSurface, PresentStatus, SurfaceBinding, SurfaceConfig, SurfaceError};
use crate::resource::{ResourceId, ResourceTable};
use crate::window::{HeadlessWindow, NativeWindow};

/// Largest dimension the headless surface accepts, matching common GPU limits.
pub const HEADLESS_MAX_DIMENSION: u32 = 8192;

/// Texture produced by a [`HeadlessSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessTexture {
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
}

impl HeadlessTexture {
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.width, self.height)
    }
}

/// In-memory swapchain bound to a [`HeadlessWindow`].
///
/// Counts native calls and lets tests inject acquisition failures, present statuses and
/// configure rejections.
#[derive(Debug)]
pub struct HeadlessSurface {
    /// Released on destroy, like the wgpu backend does.
    window: Option<HeadlessWindow>,
    formats: Vec<wgpu::TextureFormat>,
    alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    present_modes: Vec<wgpu::PresentMode>,

    config: Option<SurfaceConfig>,
    textures: ResourceTable<HeadlessTexture>,
    destroyed: bool,

    acquire_faults: VecDeque<AcquireFailure>,
    present_statuses: VecDeque<PresentStatus>,
    reject_configure: Option<String>,

    configure_calls: u32,
    acquire_calls: u32,
    present_calls: u32,
    presented: Vec<ResourceId>,
}

impl HeadlessSurface {
    pub fn new(window: &HeadlessWindow) -> Self {
        Self {
            window: Some(window.clone()),
            formats: vec![
                wgpu::TextureFormat::Bgra8UnormSrgb,
                wgpu::TextureFormat::Rgba8Unorm,
            ],
            alpha_modes: vec![
                wgpu::CompositeAlphaMode::Opaque,
                wgpu::CompositeAlphaMode::PreMultiplied,
            ],
            present_modes: vec![
                wgpu::PresentMode::Fifo,
                wgpu::PresentMode::Mailbox,
                wgpu::PresentMode::Immediate,
            ],
            config: None,
            textures: ResourceTable::new(),
            destroyed: false,
            acquire_faults: VecDeque::new(),
            present_statuses: VecDeque::new(),
            reject_configure: None,
            configure_calls: 0,
            acquire_calls: 0,
            present_calls: 0,
            presented: Vec::new(),
        }
    }

    /// Replaces the supported formats; the first one is the preferred format.
    pub fn with_formats(mut self, formats: Vec<wgpu::TextureFormat>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_alpha_modes(mut self, alpha_modes: Vec<wgpu::CompositeAlphaMode>) -> Self {
        self.alpha_modes = alpha_modes;
        self
    }

    // ── fault injection ───────────────────────────────────────────────────

    pub fn fail_next_acquire(&mut self, failure: AcquireFailure) {
        self.acquire_faults.push_back(failure);
    }

    pub fn set_next_present_status(&mut self, status: PresentStatus) {
        self.present_statuses.push_back(status);
    }

    pub fn reject_next_configure(&mut self, reason: impl Into<String>) {
        self.reject_configure = Some(reason.into());
    }

    // ── observation ───────────────────────────────────────────────────────

    pub fn configure_calls(&self) -> u32 {
        self.configure_calls
    }

    pub fn acquire_calls(&self) -> u32 {
        self.acquire_calls
    }

    pub fn present_calls(&self) -> u32 {
        self.present_calls
    }

    /// Ids passed to `present`, in order.
    pub fn presented(&self) -> &[ResourceId] {
        &self.presented
    }

    /// Configuration the native side last accepted.
    pub fn applied_config(&self) -> Option<&SurfaceConfig> {
        self.config.as_ref()
    }

    pub fn outstanding_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn validate(&self, config: &SurfaceConfig) -> Result<(), String> {
        if !self.formats.contains(&config.format) {
            return Err(format!("format {:?} is not supported", config.format));
        }
        if !self.alpha_modes.contains(&config.alpha_mode) {
            return Err(format!("alpha mode {:?} is not supported", config.alpha_mode));
        }
        if !self.present_modes.contains(&config.present_mode) {
            return Err(format!(
                "present mode {:?} is not supported",
                config.present_mode
            ));
        }
        if config.width > HEADLESS_MAX_DIMENSION || config.height > HEADLESS_MAX_DIMENSION {
            return Err(format!(
                "{}x{} exceeds the maximum dimension {HEADLESS_MAX_DIMENSION}",
                config.width, config.height
            ));
        }
        Ok(())
    }
}

impl NativeSurface for HeadlessSurface {
    type Texture = HeadlessTexture;

    fn window_size(&self) -> PhysicalSize<u32> {
        self.window
            .as_ref()
            .map_or(PhysicalSize::new(0, 0), |w| w.inner_size())
    }

    fn preferred_format(&self) -> wgpu::TextureFormat {
        self.formats
            .first()
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    fn default_alpha_mode(&self) -> wgpu::CompositeAlphaMode {
        self.alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }

    fn configure(
        &mut self,
        _binding: &SurfaceBinding,
        config: &SurfaceConfig,
    ) -> Result<(), SurfaceError> {
        self.configure_calls += 1;
        if let Some(reason) = self.reject_configure.take() {
            return Err(SurfaceError::Configuration(reason));
        }
        self.validate(config).map_err(SurfaceError::Configuration)?;

        self.textures.clear();
        self.config = Some(config.clone());
        Ok(())
    }

    fn acquire(&mut self) -> Result<ResourceId, AcquireFailure> {
        self.acquire_calls += 1;
        if let Some(failure) = self.acquire_faults.pop_front() {
            return Err(failure);
        }
        let Some(config) = &self.config else {
            return Err(AcquireFailure::Outdated);
        };

        let texture = HeadlessTexture {
            format: config.format,
            width: config.width,
            height: config.height,
        };
        Ok(self.textures.insert(texture))
    }

    fn present(&mut self, id: ResourceId) -> PresentStatus {
        self.present_calls += 1;
        if self.textures.take(id).is_none() {
            return PresentStatus::Lost;
        }
        self.presented.push(id);
        self.present_statuses
            .pop_front()
            .unwrap_or(PresentStatus::Good)
    }

    fn texture(&self, id: ResourceId) -> Option<&HeadlessTexture> {
        self.textures.get(id)
    }

    fn destroy(&mut self) {
        self.textures.clear();
        self.config = None;
        self.window = None;
        self.destroyed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::config::{DEFAULT_FRAME_LATENCY, DEFAULT_USAGE};
    use crate::window::{WindowId, WindowOptions};

    fn binding() -> SurfaceBinding {
        SurfaceBinding {
            device: ResourceId::new(0),
            adapter: ResourceId::new(1),
        }
    }

    fn config(width: u32, height: u32) -> SurfaceConfig {
        SurfaceConfig {
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width,
            height,
            usage: DEFAULT_USAGE,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: wgpu::CompositeAlphaMode::Opaque,
            view_formats: vec![],
            desired_maximum_frame_latency: DEFAULT_FRAME_LATENCY,
        }
    }

    fn surface() -> HeadlessSurface {
        let window = HeadlessWindow::new(WindowId::from_raw(1), &WindowOptions::default());
        HeadlessSurface::new(&window)
    }

    #[test]
    fn window_size_tracks_host_resizes() {
        let window = HeadlessWindow::new(WindowId::from_raw(1), &WindowOptions::default());
        let s = HeadlessSurface::new(&window);
        window.host_resize(PhysicalSize::new(300, 200));
        assert_eq!(s.window_size(), PhysicalSize::new(300, 200));
    }

    #[test]
    fn oversized_configuration_is_rejected() {
        let mut s = surface();
        let err = s.configure(&binding(), &config(9000, 10)).unwrap_err();
        assert!(matches!(err, SurfaceError::Configuration(_)));
        assert!(s.applied_config().is_none());
    }

    #[test]
    fn configure_drops_outstanding_textures() {
        let mut s = surface();
        s.configure(&binding(), &config(10, 10)).unwrap();
        s.acquire().unwrap();
        assert_eq!(s.outstanding_textures(), 1);

        s.configure(&binding(), &config(20, 20)).unwrap();
        assert_eq!(s.outstanding_textures(), 0);
    }

    #[test]
    fn presenting_unknown_texture_reports_lost() {
        let mut s = surface();
        s.configure(&binding(), &config(10, 10)).unwrap();
        assert_eq!(s.present(ResourceId::new(42)), PresentStatus::Lost);
        assert!(s.presented().is_empty());
    }

    #[test]
    fn destroy_releases_the_window() {
        let window = HeadlessWindow::new(WindowId::from_raw(1), &WindowOptions::default());
        let mut s = HeadlessSurface::new(&window);
        assert_eq!(window.view_count(), 2);

        s.destroy();
        assert_eq!(window.view_count(), 1);
        assert_eq!(s.window_size(), PhysicalSize::new(0, 0));
    }

    #[test]
    fn injected_rejection_applies_once() {
        let mut s = surface();
        s.reject_next_configure("device lost");
        assert_eq!(
            s.configure(&binding(), &config(10, 10)),
            Err(SurfaceError::Configuration("device lost".to_string()))
        );
        assert!(s.configure(&binding(), &config(10, 10)).is_ok());
        assert_eq!(s.configure_calls(), 2);
    }
}
