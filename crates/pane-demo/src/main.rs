use std::rc::Rc;
use std::time::Instant;

use anyhow::{Context, Result};

use pane_engine::device::{GpuContext, GpuInit};
use pane_engine::event::{Event, WindowEvent};
use pane_engine::logging::{LoggingConfig, init_logging};
use pane_engine::resource::HandleRegistry;
use pane_engine::runtime::{Runtime, RuntimeConfig};
use pane_engine::surface::{
    ConfigureOptions, NativeSurface, Surface, SurfaceError, SurfaceErrorAction, WgpuSurface,
};
use pane_engine::time::FpsCounter;
use pane_engine::window::{Window, WindowOptions, WinitWindow};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.09,
    b: 0.12,
    a: 1.0,
};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(RuntimeConfig::default(), |host, mut events| async move {
        let mut window = host
            .create_window(WindowOptions::new("pane").with_size(800, 600))
            .await
            .context("failed to open window")?;

        let gpu = GpuContext::new(Rc::new(HandleRegistry::new()), GpuInit::default()).await?;
        let mut surface = gpu.create_surface(&window)?;
        let format = surface.preferred_format()?;
        surface.configure(ConfigureOptions::default().with_format(format))?;

        let driver = host.start_redraw_driver();
        driver.track(&window);

        let mut fps = FpsCounter::new();
        let mut last_report = Instant::now();

        while let Some(event) = events.next_event().await {
            if event.is_close_requested(window.id()) {
                break;
            }
            match event {
                Event::Window {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    // Minimized windows report 0x0; keep the last configuration.
                    if size.width > 0 && size.height > 0 {
                        surface.reconfigure(size.width, size.height)?;
                    }
                }
                Event::RedrawRequested(id) if id == window.id() => {
                    if let Err(err) = draw_frame(&gpu, &mut surface) {
                        match err.action() {
                            SurfaceErrorAction::Reconfigure => recover(&window, &mut surface)?,
                            SurfaceErrorAction::SkipFrame => log::debug!("skipped frame: {err}"),
                            SurfaceErrorAction::Fatal => return Err(err.into()),
                        }
                        continue;
                    }

                    let now = Instant::now();
                    let rate = fps.tick(now);
                    if now.duration_since(last_report).as_secs() >= 1 {
                        log::info!("{rate:.1} fps");
                        last_report = now;
                    }
                }
                Event::LoopExiting => break,
                _ => {}
            }
        }

        driver.stop();
        surface.destroy();
        window.close();
        anyhow::Ok(())
    })
}

fn draw_frame(
    gpu: &GpuContext,
    surface: &mut Surface<WgpuSurface>,
) -> Result<(), SurfaceError> {
    let frame = surface.get_current_texture()?;
    {
        let texture = surface.texture(&frame)?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pane demo encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pane demo clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        gpu.queue().submit(Some(encoder.finish()));
    }

    let status = surface.present()?;
    if status.needs_reconfigure() {
        let size = surface.native().window_size();
        if size.width > 0 && size.height > 0 {
            surface.reconfigure(size.width, size.height)?;
        }
    }
    Ok(())
}

fn recover(window: &Window<WinitWindow>, surface: &mut Surface<WgpuSurface>) -> Result<()> {
    let size = window.size()?;
    if size.width == 0 || size.height == 0 {
        return Ok(());
    }
    match surface.reconfigure(size.width, size.height) {
        Ok(()) => Ok(()),
        // A surface never configured successfully has no record to resize.
        Err(SurfaceError::NotConfigured) => surface
            .configure(ConfigureOptions::default().with_size(size.width, size.height))
            .map_err(Into::into),
        Err(err) => Err(err.into()),
    }
}
