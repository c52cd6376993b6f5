use std::rc::Rc;

use anyhow::{Context, Result};

use super::GpuInit;
use crate::resource::{Handle, HandleKey, HandleRegistry, ResourceId, ResourceTable};
use crate::surface::{Surface, WgpuSurface};
use crate::window::{Window, WinitWindow};

/// The selected adapter, registered in the handle registry.
#[derive(Debug, Clone)]
pub struct GpuAdapter {
    key: HandleKey,
    adapter: wgpu::Adapter,
}

impl GpuAdapter {
    pub fn get(&self) -> &wgpu::Adapter {
        &self.adapter
    }
}

impl Handle for GpuAdapter {
    fn handle_key(&self) -> HandleKey {
        self.key
    }
}

/// Logical device and its queue, registered in the handle registry.
#[derive(Debug, Clone)]
pub struct GpuDevice {
    key: HandleKey,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuDevice {
    pub fn get(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl Handle for GpuDevice {
    fn handle_key(&self) -> HandleKey {
        self.key
    }
}

enum GpuResource {
    Adapter(wgpu::Adapter),
    Device(wgpu::Device),
}

struct Inner {
    init: GpuInit,
    instance: wgpu::Instance,
    adapter: GpuAdapter,
    device: GpuDevice,
    resources: ResourceTable<GpuResource>,
    registry: Rc<HandleRegistry>,
}

/// Owns the wgpu instance, adapter, device and queue.
///
/// Cloning is cheap; surfaces keep a clone to look up the device they were bound to.
#[derive(Clone)]
pub struct GpuContext {
    inner: Rc<Inner>,
}

impl GpuContext {
    /// Creates the instance and requests an adapter and device.
    ///
    /// Adapter and device are bound to fresh resource ids in `registry`.
    pub async fn new(registry: Rc<HandleRegistry>, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pane device"),
                required_features: init.required_features,
                required_limits: init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let mut resources = ResourceTable::new();
        let adapter_id = resources.insert(GpuResource::Adapter(adapter.clone()));
        let device_id = resources.insert(GpuResource::Device(device.clone()));

        let adapter = GpuAdapter {
            key: registry.allocate(),
            adapter,
        };
        let device = GpuDevice {
            key: registry.allocate(),
            device,
            queue,
        };
        registry.bind(&adapter, adapter_id);
        registry.bind(&device, device_id);

        Ok(Self {
            inner: Rc::new(Inner {
                init,
                instance,
                adapter,
                device,
                resources,
                registry,
            }),
        })
    }

    pub fn init(&self) -> &GpuInit {
        &self.inner.init
    }

    pub fn adapter(&self) -> &GpuAdapter {
        &self.inner.adapter
    }

    pub fn gpu_device(&self) -> &GpuDevice {
        &self.inner.device
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.inner.device.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.inner.device.queue
    }

    pub fn registry(&self) -> &Rc<HandleRegistry> {
        &self.inner.registry
    }

    pub fn adapter_by_id(&self, id: ResourceId) -> Option<&wgpu::Adapter> {
        match self.inner.resources.get(id)? {
            GpuResource::Adapter(adapter) => Some(adapter),
            GpuResource::Device(_) => None,
        }
    }

    pub fn device_by_id(&self, id: ResourceId) -> Option<&wgpu::Device> {
        match self.inner.resources.get(id)? {
            GpuResource::Device(device) => Some(device),
            GpuResource::Adapter(_) => None,
        }
    }

    /// Creates an unconfigured surface for `window`, bound to this adapter and device.
    pub fn create_surface(&self, window: &Window<WinitWindow>) -> Result<Surface<WgpuSurface>> {
        let native_window = window.native()?.clone();

        let surface = self
            .inner
            .instance
            .create_surface(native_window.winit().clone())
            .context("failed to create wgpu surface")?;

        let adapter = self.adapter().get();
        anyhow::ensure!(
            adapter.is_surface_supported(&surface),
            "adapter cannot present to {}",
            window.id()
        );
        let caps = surface.get_capabilities(adapter);
        log::debug!(
            "surface caps for {}: formats {:?}, present modes {:?}",
            window.id(),
            caps.formats,
            caps.present_modes
        );

        let native = WgpuSurface::new(self.clone(), native_window, surface, caps);
        let surface = Surface::new(
            native,
            window,
            &self.inner.device,
            &self.inner.adapter,
            self.inner.registry.clone(),
        )
        .with_context(|| format!("failed to bind surface for {}", window.id()))?;
        Ok(surface)
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("adapter", &self.inner.adapter.key)
            .field("device", &self.inner.device.key)
            .finish()
    }
}
