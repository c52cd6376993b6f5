use std::rc::Rc;

use super::{
    ConfigureOptions, FrameTexture, NativeSurface, PresentStatus, SurfaceBinding, SurfaceConfig,
    SurfaceError, config,
};
use crate::resource::{Handle, HandleKey, HandleRegistry, ResourceId};
use crate::window::{NativeWindow, Window, WindowId};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceState {
    Unconfigured,
    Configured(SurfaceConfig),
    Destroyed,
}

/// A window's presentable surface.
///
/// Bound to one window and one (device, adapter) pair for its whole life. At most one
/// frame is acquired at a time: [`get_current_texture`](Self::get_current_texture)
/// returns the same [`FrameTexture`] until [`present`](Self::present) or a successful
/// [`configure`](Self::configure) invalidates it.
pub struct Surface<S: NativeSurface> {
    native: S,
    window_id: WindowId,
    binding: SurfaceBinding,
    registry: Rc<HandleRegistry>,
    state: SurfaceState,
    /// Set when the native side rejected the last configure; acquisition is blocked.
    needs_reconfigure: bool,
    frame_slot: HandleKey,
    generation: u64,
    current: Option<FrameTexture>,
    acquisitions: u64,
}

impl<S: NativeSurface> Surface<S> {
    /// Binds `native` to `window` and resolves the device and adapter handles.
    pub fn new<W: NativeWindow>(
        native: S,
        window: &Window<W>,
        device: &impl Handle,
        adapter: &impl Handle,
        registry: Rc<HandleRegistry>,
    ) -> Result<Self, SurfaceError> {
        window.native()?;
        let binding = SurfaceBinding {
            device: registry.resolve(device)?,
            adapter: registry.resolve(adapter)?,
        };
        let frame_slot = registry.allocate();

        log::debug!(
            "surface for {} bound to device {} / adapter {}",
            window.id(),
            binding.device,
            binding.adapter
        );

        Ok(Self {
            native,
            window_id: window.id(),
            binding,
            registry,
            state: SurfaceState::Unconfigured,
            needs_reconfigure: false,
            frame_slot,
            generation: 0,
            current: None,
            acquisitions: 0,
        })
    }

    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    pub fn binding(&self) -> SurfaceBinding {
        self.binding
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    /// Last configuration accepted by [`configure`](Self::configure).
    pub fn config(&self) -> Option<&SurfaceConfig> {
        match &self.state {
            SurfaceState::Configured(config) => Some(config),
            _ => None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config().is_some() && !self.needs_reconfigure
    }

    /// Registry key that always resolves to the most recently acquired texture.
    pub fn frame_slot(&self) -> HandleKey {
        self.frame_slot
    }

    pub fn current_frame(&self) -> Option<FrameTexture> {
        self.current
    }

    /// Number of native acquisitions so far.
    pub fn acquisition_count(&self) -> u64 {
        self.acquisitions
    }

    pub fn native(&self) -> &S {
        &self.native
    }

    pub fn native_mut(&mut self) -> &mut S {
        &mut self.native
    }

    fn ensure_live(&self) -> Result<(), SurfaceError> {
        if self.state == SurfaceState::Destroyed {
            log::error!("surface for {} used after destroy", self.window_id);
            return Err(SurfaceError::Destroyed);
        }
        Ok(())
    }

    // ── configuration ─────────────────────────────────────────────────────

    pub fn preferred_format(&self) -> Result<wgpu::TextureFormat, SurfaceError> {
        self.ensure_live()?;
        Ok(self.native.preferred_format())
    }

    /// Applies a configuration, filling unset fields with defaults.
    ///
    /// A zero-sized request fails before reaching the native surface and leaves the
    /// previous configuration and the current frame untouched. A native rejection keeps
    /// the previous record, drops the current frame and blocks acquisition until a later
    /// configure succeeds.
    pub fn configure(&mut self, options: ConfigureOptions) -> Result<(), SurfaceError> {
        self.ensure_live()?;

        let window_size = self.native.window_size();
        let width = options.width.unwrap_or(window_size.width);
        let height = options.height.unwrap_or(window_size.height);
        if width == 0 || height == 0 {
            log::warn!(
                "rejecting zero-sized configure ({width}x{height}) for {}",
                self.window_id
            );
            return Err(SurfaceError::Configuration(format!(
                "surface size must be non-zero, got {width}x{height}"
            )));
        }

        let config = SurfaceConfig {
            format: options
                .format
                .unwrap_or_else(|| self.native.preferred_format()),
            width,
            height,
            usage: options.usage.unwrap_or(config::DEFAULT_USAGE),
            present_mode: options
                .present_mode
                .unwrap_or_else(|| self.native.default_present_mode()),
            alpha_mode: options
                .alpha_mode
                .unwrap_or_else(|| self.native.default_alpha_mode()),
            view_formats: options.view_formats,
            desired_maximum_frame_latency: options
                .desired_maximum_frame_latency
                .unwrap_or_else(|| self.native.default_frame_latency()),
        };

        if let Err(err) = self.native.configure(&self.binding, &config) {
            log::warn!("native configure rejected for {}: {err}", self.window_id);
            self.needs_reconfigure = true;
            self.current = None;
            return Err(err);
        }

        log::debug!(
            "configured surface for {}: {:?} {}x{} {:?}",
            self.window_id,
            config.format,
            config.width,
            config.height,
            config.present_mode
        );

        self.state = SurfaceState::Configured(config);
        self.needs_reconfigure = false;
        self.current = None;
        Ok(())
    }

    /// Resizes, keeping every other field of the current configuration.
    pub fn reconfigure(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.ensure_live()?;
        let options = match &self.state {
            SurfaceState::Configured(config) => {
                ConfigureOptions::from(config).with_size(width, height)
            }
            _ => return Err(SurfaceError::NotConfigured),
        };
        self.configure(options)
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Returns the current frame, acquiring one from the native surface if needed.
    ///
    /// Native failures are reported as [`SurfaceError::Acquisition`] and not retried.
    pub fn get_current_texture(&mut self) -> Result<FrameTexture, SurfaceError> {
        self.ensure_live()?;
        if !self.is_configured() {
            log::error!(
                "get_current_texture on unconfigured surface for {}",
                self.window_id
            );
            return Err(SurfaceError::NotConfigured);
        }

        if let Some(frame) = self.current {
            return Ok(frame);
        }

        let id = self.native.acquire().map_err(|failure| {
            log::warn!("acquire failed for {}: {failure}", self.window_id);
            SurfaceError::Acquisition(failure)
        })?;

        self.acquisitions += 1;
        self.generation += 1;
        self.registry.bind_key(self.frame_slot, id);

        let frame = FrameTexture {
            slot: self.frame_slot,
            generation: self.generation,
            id,
        };
        self.current = Some(frame);

        log::trace!(
            "acquired {id} (generation {}) for {}",
            self.generation,
            self.window_id
        );
        Ok(frame)
    }

    /// Presents the current frame and invalidates it, whatever the native outcome.
    pub fn present(&mut self) -> Result<PresentStatus, SurfaceError> {
        self.ensure_live()?;
        let Some(frame) = self.current.take() else {
            log::warn!("present without an acquired frame on {}", self.window_id);
            return Err(SurfaceError::NothingToPresent);
        };

        let status = self.native.present(frame.id);
        if status.is_good() {
            log::trace!("presented generation {} on {}", frame.generation, self.window_id);
        } else {
            log::warn!(
                "present of generation {} on {} returned {status:?}",
                frame.generation,
                self.window_id
            );
        }
        Ok(status)
    }

    /// Native id of `frame`, if it is still the current frame.
    pub fn resolve_frame(&self, frame: &FrameTexture) -> Result<ResourceId, SurfaceError> {
        self.ensure_live()?;
        match self.current {
            Some(current) if current.slot == frame.slot && current.generation == frame.generation => {
                Ok(self.registry.resolve(frame)?)
            }
            _ => Err(SurfaceError::StaleFrame(frame.generation)),
        }
    }

    pub fn texture(&self, frame: &FrameTexture) -> Result<&S::Texture, SurfaceError> {
        let id = self.resolve_frame(frame)?;
        self.native
            .texture(id)
            .ok_or(SurfaceError::StaleFrame(frame.generation))
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Releases the native surface. Later calls fail with [`SurfaceError::Destroyed`].
    pub fn destroy(&mut self) {
        if self.state == SurfaceState::Destroyed {
            return;
        }
        self.current = None;
        self.native.destroy();
        self.registry.unbind(self.frame_slot);
        self.state = SurfaceState::Destroyed;
        log::debug!("surface for {} destroyed", self.window_id);
    }
}

impl<S: NativeSurface> Drop for Surface<S> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<S: NativeSurface> std::fmt::Debug for Surface<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("window_id", &self.window_id)
            .field("binding", &self.binding)
            .field("state", &self.state)
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalSize;

    use super::*;
    use crate::event::{EventPump, channel};
    use crate::resource::RegistryError;
    use crate::surface::{AcquireFailure, HeadlessSurface};
    use crate::window::{HeadlessWindow, WindowError, WindowOptions};

    struct Fixture {
        registry: Rc<HandleRegistry>,
        device: HandleKey,
        adapter: HandleKey,
        window: Window<HeadlessWindow>,
        native_window: HeadlessWindow,
        _pump: EventPump,
    }

    fn fixture(width: u32, height: u32) -> Fixture {
        let registry = Rc::new(HandleRegistry::new());
        let device = registry.allocate();
        let adapter = registry.allocate();
        registry.bind_key(device, ResourceId::new(1));
        registry.bind_key(adapter, ResourceId::new(2));

        let (tx, pump) = channel();
        let id = WindowId::from_raw(7);
        let native_window =
            HeadlessWindow::new(id, &WindowOptions::default().with_size(width, height));
        let window = Window::new(native_window.clone(), tx.redraw_signal(id));

        Fixture {
            registry,
            device,
            adapter,
            window,
            native_window,
            _pump: pump,
        }
    }

    impl Fixture {
        fn surface(&self) -> Surface<HeadlessSurface> {
            Surface::new(
                HeadlessSurface::new(&self.native_window),
                &self.window,
                &self.device,
                &self.adapter,
                self.registry.clone(),
            )
            .unwrap()
        }
    }

    fn configured(fx: &Fixture) -> Surface<HeadlessSurface> {
        let mut surface = fx.surface();
        surface.configure(ConfigureOptions::new()).unwrap();
        surface
    }

    // ── construction / configure ──────────────────────────────────────────

    #[test]
    fn binding_resolves_device_and_adapter_once() {
        let fx = fixture(800, 600);
        let surface = fx.surface();
        assert_eq!(
            surface.binding(),
            SurfaceBinding {
                device: ResourceId::new(1),
                adapter: ResourceId::new(2),
            }
        );

        // Rebinding the device afterwards does not move the surface.
        fx.registry.bind_key(fx.device, ResourceId::new(99));
        assert_eq!(surface.binding().device, ResourceId::new(1));
    }

    #[test]
    fn unbound_device_fails_construction() {
        let fx = fixture(800, 600);
        let stray = fx.registry.allocate();
        let err = Surface::new(
            HeadlessSurface::new(&fx.native_window),
            &fx.window,
            &stray,
            &fx.adapter,
            fx.registry.clone(),
        )
        .unwrap_err();
        assert_eq!(err, SurfaceError::Registry(RegistryError::NotBound(stray)));
    }

    #[test]
    fn closed_window_fails_construction() {
        let mut fx = fixture(800, 600);
        fx.window.close();
        let err = Surface::new(
            HeadlessSurface::new(&fx.native_window),
            &fx.window,
            &fx.device,
            &fx.adapter,
            fx.registry.clone(),
        )
        .unwrap_err();
        assert_eq!(err, SurfaceError::Window(WindowError::Closed(fx.window.id())));
    }

    #[test]
    fn configure_defaults_come_from_window_and_native() {
        let fx = fixture(800, 600);
        let surface = configured(&fx);
        let config = surface.config().unwrap();

        assert_eq!(config.size(), PhysicalSize::new(800, 600));
        assert_eq!(config.format, surface.preferred_format().unwrap());
        assert_eq!(config.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert_eq!(config.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(config.alpha_mode, wgpu::CompositeAlphaMode::Opaque);
    }

    #[test]
    fn zero_size_configure_keeps_previous_state() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        let frame = surface.get_current_texture().unwrap();
        let configure_calls = surface.native().configure_calls();

        let err = surface
            .configure(ConfigureOptions::new().with_size(0, 600))
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Configuration(_)));

        assert_eq!(surface.native().configure_calls(), configure_calls);
        assert_eq!(surface.config().unwrap().size(), PhysicalSize::new(800, 600));
        assert_eq!(surface.get_current_texture().unwrap(), frame);
        assert_eq!(surface.acquisition_count(), 1);
    }

    #[test]
    fn minimized_window_rejects_default_configure() {
        let fx = fixture(800, 600);
        fx.native_window.host_resize(PhysicalSize::new(0, 0));
        let mut surface = fx.surface();
        assert!(matches!(
            surface.configure(ConfigureOptions::new()),
            Err(SurfaceError::Configuration(_))
        ));
        assert_eq!(surface.state(), &SurfaceState::Unconfigured);
    }

    #[test]
    fn native_rejection_blocks_acquisition_until_reconfigured() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let err = surface
            .configure(ConfigureOptions::new().with_format(wgpu::TextureFormat::R8Unorm))
            .unwrap_err();
        assert!(matches!(err, SurfaceError::Configuration(_)));

        // The previous record is kept but frames cannot be acquired.
        assert!(surface.config().is_some());
        assert_eq!(
            surface.get_current_texture(),
            Err(SurfaceError::NotConfigured)
        );

        surface.configure(ConfigureOptions::new()).unwrap();
        assert!(surface.get_current_texture().is_ok());
    }

    #[test]
    fn native_rejection_drops_the_cached_frame() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        let frame = surface.get_current_texture().unwrap();

        surface.native_mut().reject_next_configure("device lost");
        assert!(matches!(
            surface.configure(ConfigureOptions::new()),
            Err(SurfaceError::Configuration(_))
        ));

        assert_eq!(surface.current_frame(), None);
        assert_eq!(
            surface.resolve_frame(&frame),
            Err(SurfaceError::StaleFrame(frame.generation()))
        );
        assert_eq!(surface.present(), Err(SurfaceError::NothingToPresent));
        assert_eq!(surface.native().present_calls(), 0);
    }

    #[test]
    fn reconfigure_keeps_format_and_present_mode() {
        let fx = fixture(800, 600);
        let mut surface = fx.surface();
        surface
            .configure(
                ConfigureOptions::new()
                    .with_format(wgpu::TextureFormat::Rgba8Unorm)
                    .with_present_mode(wgpu::PresentMode::Mailbox),
            )
            .unwrap();

        surface.reconfigure(1024, 768).unwrap();
        let config = surface.config().unwrap();
        assert_eq!(config.size(), PhysicalSize::new(1024, 768));
        assert_eq!(config.format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.present_mode, wgpu::PresentMode::Mailbox);
    }

    #[test]
    fn reconfigure_requires_prior_configure() {
        let fx = fixture(800, 600);
        let mut surface = fx.surface();
        assert_eq!(surface.reconfigure(10, 10), Err(SurfaceError::NotConfigured));
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn acquisition_requires_configure() {
        let fx = fixture(800, 600);
        let mut surface = fx.surface();
        assert_eq!(
            surface.get_current_texture(),
            Err(SurfaceError::NotConfigured)
        );
        assert_eq!(surface.native().acquire_calls(), 0);
    }

    #[test]
    fn single_acquisition_per_cycle() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let a = surface.get_current_texture().unwrap();
        let b = surface.get_current_texture().unwrap();
        assert_eq!(a, b);
        assert_eq!(surface.acquisition_count(), 1);
        assert_eq!(surface.native().acquire_calls(), 1);
    }

    #[test]
    fn present_advances_to_a_new_frame() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let first = surface.get_current_texture().unwrap();
        assert_eq!(surface.present().unwrap(), PresentStatus::Good);
        let second = surface.get_current_texture().unwrap();

        assert_ne!(first, second);
        assert_ne!(first.resource_id(), second.resource_id());
        assert_eq!(surface.acquisition_count(), 2);
    }

    #[test]
    fn configure_invalidates_current_frame() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let before = surface.get_current_texture().unwrap();
        surface.reconfigure(640, 480).unwrap();
        let after = surface.get_current_texture().unwrap();

        assert_ne!(before, after);
        assert_eq!(surface.acquisition_count(), 2);
        assert_eq!(
            surface.texture(&after).unwrap().size(),
            PhysicalSize::new(640, 480)
        );
    }

    #[test]
    fn present_without_frame_fails() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        assert_eq!(surface.present(), Err(SurfaceError::NothingToPresent));

        surface.get_current_texture().unwrap();
        surface.present().unwrap();
        assert_eq!(surface.present(), Err(SurfaceError::NothingToPresent));
        assert_eq!(surface.native().present_calls(), 1);
    }

    #[test]
    fn acquisition_failure_is_reported_not_retried() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        surface.native_mut().fail_next_acquire(AcquireFailure::Timeout);

        assert_eq!(
            surface.get_current_texture(),
            Err(SurfaceError::Acquisition(AcquireFailure::Timeout))
        );
        assert_eq!(surface.native().acquire_calls(), 1);
        assert_eq!(surface.acquisition_count(), 0);
        assert!(surface.get_current_texture().is_ok());
    }

    #[test]
    fn non_good_present_still_invalidates_frame() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        surface
            .native_mut()
            .set_next_present_status(PresentStatus::Outdated);

        let frame = surface.get_current_texture().unwrap();
        assert_eq!(surface.present().unwrap(), PresentStatus::Outdated);
        assert_eq!(surface.current_frame(), None);
        assert_eq!(
            surface.resolve_frame(&frame),
            Err(SurfaceError::StaleFrame(frame.generation()))
        );
    }

    #[test]
    fn frame_slot_is_rebound_each_acquisition() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let first = surface.get_current_texture().unwrap();
        assert_eq!(fx.registry.resolve(&surface.frame_slot()), Ok(first.resource_id()));
        surface.present().unwrap();

        let second = surface.get_current_texture().unwrap();
        assert_eq!(first.slot(), second.slot());
        assert_eq!(fx.registry.resolve(&first), Ok(second.resource_id()));
    }

    #[test]
    fn stale_frames_do_not_resolve() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);

        let frame = surface.get_current_texture().unwrap();
        assert!(surface.texture(&frame).is_ok());
        surface.present().unwrap();

        assert_eq!(
            surface.texture(&frame).unwrap_err(),
            SurfaceError::StaleFrame(frame.generation())
        );
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn destroyed_surface_rejects_everything() {
        let fx = fixture(800, 600);
        let mut surface = configured(&fx);
        let frame = surface.get_current_texture().unwrap();
        surface.destroy();

        assert!(surface.native().is_destroyed());
        assert_eq!(
            fx.registry.resolve(&frame),
            Err(RegistryError::NotBound(frame.slot()))
        );
        assert_eq!(surface.preferred_format(), Err(SurfaceError::Destroyed));
        assert_eq!(
            surface.configure(ConfigureOptions::new()),
            Err(SurfaceError::Destroyed)
        );
        assert_eq!(surface.get_current_texture(), Err(SurfaceError::Destroyed));
        assert_eq!(surface.present(), Err(SurfaceError::Destroyed));

        // Idempotent.
        surface.destroy();
    }

    #[test]
    fn destroy_then_close_releases_every_window_view() {
        let mut fx = fixture(800, 600);
        let mut surface = configured(&fx);
        // Fixture, window wrapper and surface.
        assert_eq!(fx.native_window.view_count(), 3);

        surface.destroy();
        assert_eq!(fx.native_window.view_count(), 2);

        fx.window.close();
        assert_eq!(fx.native_window.view_count(), 1);
    }

    #[test]
    fn end_to_end_window_to_second_frame() {
        let fx = fixture(800, 600);
        let mut surface = fx.surface();
        let format = surface.preferred_format().unwrap();
        surface
            .configure(ConfigureOptions::new().with_format(format))
            .unwrap();

        let t1 = surface.get_current_texture().unwrap();
        assert_eq!(
            surface.texture(&t1).unwrap().size(),
            PhysicalSize::new(800, 600)
        );
        surface.present().unwrap();
        let t2 = surface.get_current_texture().unwrap();

        assert_ne!(t1, t2);
        assert_eq!(surface.native().presented(), &[t1.resource_id()]);
    }
}
