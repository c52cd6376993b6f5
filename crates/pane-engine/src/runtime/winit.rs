use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::event::{
    DeviceEvent as WinitDeviceEvent, DeviceId, StartCause as WinitStartCause,
    WindowEvent as WinitWindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};

use super::scheduler::{Progress, Scheduler};
use super::{Host, Notify, RuntimeConfig};
use crate::event::{Event, EventPump, EventSender, channel};
use crate::input::InputState;
use crate::input::platform::winit::{
    device_id_hash, translate_device_event, translate_start_cause, translate_window_event,
};
use crate::window::{WindowId, WinitWindow};

#[derive(Debug, Clone, Copy)]
enum UserEvent {
    /// The application task was woken from another thread.
    Wake,
}

/// Entry point for the winit runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` on the winit event loop until it returns, goes idle, or the loop exits.
    ///
    /// `app` receives the [`Host`] for window creation and redraw drivers and the
    /// [`EventPump`] carrying every native event.
    pub fn run<F, Fut>(config: RuntimeConfig, app: F) -> Result<()>
    where
        F: FnOnce(Host<WinitWindow>, EventPump) -> Fut,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let event_loop = EventLoop::<UserEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let proxy = Mutex::new(event_loop.create_proxy());
        let notify: Notify = Box::new(move || {
            if let Ok(proxy) = proxy.lock() {
                // Fails only once the loop is gone.
                let _ = proxy.send_event(UserEvent::Wake);
            }
        });

        let (events, pump) = channel();
        let scheduler = Scheduler::new(&config, events.clone(), pump, Some(notify), app);
        let mut state = LoopState {
            scheduler,
            events,
            inputs: HashMap::new(),
            resumed: false,
            outcome: None,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.outcome.unwrap_or(Ok(()))
    }
}

struct LoopState {
    scheduler: Scheduler<WinitWindow>,
    events: EventSender,
    /// Per-window modifier/pointer tracking for event translation.
    inputs: HashMap<WindowId, InputState>,
    /// The application is first polled on `resumed`, where window creation is portable.
    resumed: bool,
    outcome: Option<Result<()>>,
}

impl LoopState {
    fn drive(&mut self, event_loop: &ActiveEventLoop) {
        if !self.resumed || self.outcome.is_some() {
            return;
        }

        let progress = self
            .scheduler
            .drive(&mut |options| WinitWindow::create(event_loop, options));

        match progress {
            Progress::Running => {}
            Progress::Finished(result) => {
                if let Err(e) = &result {
                    log::error!("application failed: {e:#}");
                }
                self.outcome = Some(result);
                event_loop.exit();
            }
            Progress::Idle => {
                log::info!("application is idle; exiting");
                self.outcome = Some(Ok(()));
                event_loop.exit();
            }
        }
    }

    fn push(&mut self, event_loop: &ActiveEventLoop, event: Event) {
        self.events.push(event);
        self.drive(event_loop);
    }
}

impl ApplicationHandler<UserEvent> for LoopState {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: WinitStartCause) {
        if matches!(cause, WinitStartCause::ResumeTimeReached { .. }) {
            self.scheduler.fire_due(Instant::now());
        }
        self.push(event_loop, Event::NewEvents(translate_start_cause(cause)));
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.resumed = true;
        self.push(event_loop, Event::Resumed);
    }

    fn suspended(&mut self, event_loop: &ActiveEventLoop) {
        self.push(event_loop, Event::Suspended);
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Wake => self.drive(event_loop),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WinitWindowEvent,
    ) {
        let id = WindowId::from(window_id);

        if matches!(event, WinitWindowEvent::RedrawRequested) {
            // Exposure from the OS; joins any pending request.
            self.events.request_redraw(id);
            self.drive(event_loop);
            return;
        }

        let input = self.inputs.entry(id).or_default();
        let translated = translate_window_event(input, &event);
        if matches!(event, WinitWindowEvent::Destroyed) {
            self.inputs.remove(&id);
        }

        if let Some(event) = translated {
            self.push(
                event_loop,
                Event::Window {
                    window_id: id,
                    event,
                },
            );
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        device_id: DeviceId,
        event: WinitDeviceEvent,
    ) {
        if let Some(event) = translate_device_event(&event) {
            self.push(
                event_loop,
                Event::Device {
                    device_id: device_id_hash(device_id),
                    event,
                },
            );
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        self.scheduler.fire_due(now);
        self.push(event_loop, Event::MainEventsCleared);

        if self.outcome.is_some() {
            return;
        }

        match self.scheduler.next_deadline(now) {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        self.events.push(Event::LoopExiting);
        self.events.close();
        self.drive(event_loop);
    }

    fn memory_warning(&mut self, event_loop: &ActiveEventLoop) {
        self.push(event_loop, Event::MemoryWarning);
    }
}
