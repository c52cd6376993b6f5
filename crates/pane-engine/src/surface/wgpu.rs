use winit::dpi::PhysicalSize;

use super::config::{choose_alpha_mode, choose_surface_format};
use super::{AcquireFailure, NativeSurface, PresentStatus, SurfaceBinding, SurfaceConfig, SurfaceError};
use crate::device::GpuContext;
use crate::resource::{ResourceId, ResourceTable};
use crate::window::{NativeWindow, WinitWindow};

/// Swapchain backed by a `wgpu::Surface`.
///
/// Configurations are validated against the surface capabilities before they reach
/// wgpu, so an unsupported request comes back as an error instead of a validation panic.
pub struct WgpuSurface {
    gpu: GpuContext,
    /// Released on destroy so closing the window drops the OS window.
    window: Option<WinitWindow>,
    surface: Option<wgpu::Surface<'static>>,
    caps: wgpu::SurfaceCapabilities,
    frames: ResourceTable<wgpu::SurfaceTexture>,
}

impl WgpuSurface {
    pub(crate) fn new(
        gpu: GpuContext,
        window: WinitWindow,
        surface: wgpu::Surface<'static>,
        caps: wgpu::SurfaceCapabilities,
    ) -> Self {
        Self {
            gpu,
            window: Some(window),
            surface: Some(surface),
            caps,
            frames: ResourceTable::new(),
        }
    }

    pub fn capabilities(&self) -> &wgpu::SurfaceCapabilities {
        &self.caps
    }

    /// Whether the surface still holds its window.
    pub fn holds_window(&self) -> bool {
        self.window.is_some()
    }

    fn validate(&self, config: &SurfaceConfig, max_dimension: u32) -> Result<(), String> {
        if !self.caps.formats.contains(&config.format) {
            return Err(format!(
                "format {:?} not in supported formats {:?}",
                config.format, self.caps.formats
            ));
        }
        if !self.caps.present_modes.contains(&config.present_mode) {
            return Err(format!(
                "present mode {:?} not in supported modes {:?}",
                config.present_mode, self.caps.present_modes
            ));
        }
        if !self.caps.alpha_modes.contains(&config.alpha_mode) {
            return Err(format!(
                "alpha mode {:?} not in supported modes {:?}",
                config.alpha_mode, self.caps.alpha_modes
            ));
        }
        if !self.caps.usages.contains(config.usage) {
            return Err(format!(
                "usage {:?} exceeds supported usages {:?}",
                config.usage, self.caps.usages
            ));
        }
        if config.width > max_dimension || config.height > max_dimension {
            return Err(format!(
                "{}x{} exceeds max texture dimension {max_dimension}",
                config.width, config.height
            ));
        }
        Ok(())
    }
}

impl NativeSurface for WgpuSurface {
    type Texture = wgpu::SurfaceTexture;

    fn window_size(&self) -> PhysicalSize<u32> {
        self.window
            .as_ref()
            .map_or(PhysicalSize::new(0, 0), |w| w.inner_size())
    }

    fn preferred_format(&self) -> wgpu::TextureFormat {
        choose_surface_format(&self.caps.formats, self.gpu.init().prefer_srgb)
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb)
    }

    fn default_alpha_mode(&self) -> wgpu::CompositeAlphaMode {
        choose_alpha_mode(&self.caps.alpha_modes, self.gpu.init().alpha_mode)
    }

    fn default_present_mode(&self) -> wgpu::PresentMode {
        let requested = self.gpu.init().present_mode;
        if self.caps.present_modes.contains(&requested) {
            requested
        } else {
            wgpu::PresentMode::Fifo
        }
    }

    fn default_frame_latency(&self) -> u32 {
        self.gpu.init().desired_maximum_frame_latency
    }

    fn configure(
        &mut self,
        binding: &SurfaceBinding,
        config: &SurfaceConfig,
    ) -> Result<(), SurfaceError> {
        let device = self.gpu.device_by_id(binding.device).ok_or_else(|| {
            SurfaceError::Configuration(format!("{} is not a live device", binding.device))
        })?;
        let max_dimension = device.limits().max_texture_dimension_2d;
        self.validate(config, max_dimension)
            .map_err(SurfaceError::Configuration)?;

        let Some(surface) = &self.surface else {
            return Err(SurfaceError::Destroyed);
        };

        // wgpu refuses to reconfigure while a texture is still held.
        self.frames.clear();
        surface.configure(device, &config.to_wgpu());
        Ok(())
    }

    fn acquire(&mut self) -> Result<ResourceId, AcquireFailure> {
        let Some(surface) = &self.surface else {
            return Err(AcquireFailure::Lost);
        };

        match surface.get_current_texture() {
            Ok(texture) => Ok(self.frames.insert(texture)),
            Err(wgpu::SurfaceError::Timeout) => Err(AcquireFailure::Timeout),
            Err(wgpu::SurfaceError::Outdated) => Err(AcquireFailure::Outdated),
            Err(wgpu::SurfaceError::Lost) => Err(AcquireFailure::Lost),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(AcquireFailure::OutOfMemory),
            Err(wgpu::SurfaceError::Other) => Err(AcquireFailure::Other),
        }
    }

    fn present(&mut self, id: ResourceId) -> PresentStatus {
        let Some(texture) = self.frames.take(id) else {
            return PresentStatus::Lost;
        };
        let suboptimal = texture.suboptimal;
        texture.present();
        if suboptimal {
            PresentStatus::Suboptimal
        } else {
            PresentStatus::Good
        }
    }

    fn texture(&self, id: ResourceId) -> Option<&wgpu::SurfaceTexture> {
        self.frames.get(id)
    }

    fn destroy(&mut self) {
        self.frames.clear();
        // The surface borrows the window, so it goes first.
        self.surface = None;
        self.window = None;
    }
}
