use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};

use winit::dpi::PhysicalSize;

use super::scheduler::{Progress, Scheduler};
use super::{Host, RuntimeConfig};
use crate::event::{Event, EventPump, EventSender, WindowEvent, channel};
use crate::window::{HeadlessWindow, WindowError, WindowId};

/// How a headless run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The application future returned `Ok`.
    Completed,
    /// The application future returned an error.
    Failed(anyhow::Error),
    /// The application was left waiting with nothing to wake it.
    Idle,
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Outcome::Idle)
    }
}

/// Runtime driven by a script instead of an OS event loop.
///
/// Events are injected with [`dispatch`](Self::dispatch) and time moves only through
/// [`advance`](Self::advance), so redraw drivers fire deterministically. Windows are
/// [`HeadlessWindow`]s; nothing is injected that the script does not send.
pub struct HeadlessRuntime {
    scheduler: Scheduler<HeadlessWindow>,
    events: EventSender,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    next_window: u64,
    reject_next_window: Option<String>,
    now: Instant,
    outcome: Option<Outcome>,
}

impl HeadlessRuntime {
    /// Creates the runtime and runs `app` until it first parks.
    pub fn start<F, Fut>(config: RuntimeConfig, app: F) -> Self
    where
        F: FnOnce(Host<HeadlessWindow>, EventPump) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        let (events, pump) = channel();
        let scheduler = Scheduler::new(&config, events.clone(), pump, None, app);
        let mut runtime = Self {
            scheduler,
            events,
            windows: BTreeMap::new(),
            next_window: 0,
            reject_next_window: None,
            now: Instant::now(),
            outcome: None,
        };
        runtime.drive();
        runtime
    }

    fn drive(&mut self) {
        if self.outcome.is_some() {
            return;
        }

        let Self {
            scheduler,
            windows,
            next_window,
            reject_next_window,
            ..
        } = self;

        let progress = scheduler.drive(&mut |options| {
            if let Some(reason) = reject_next_window.take() {
                return Err(WindowError::Creation(reason));
            }
            *next_window += 1;
            let id = WindowId::from_raw(*next_window);
            let window = HeadlessWindow::new(id, options);
            windows.insert(id, window.clone());
            Ok(window)
        });

        match progress {
            Progress::Running => {
                // Starts the schedule of drivers created during this drive.
                self.scheduler.next_deadline(self.now);
            }
            Progress::Finished(Ok(())) => self.outcome = Some(Outcome::Completed),
            Progress::Finished(Err(e)) => self.outcome = Some(Outcome::Failed(e)),
            Progress::Idle => self.outcome = Some(Outcome::Idle),
        }
    }

    /// Delivers one native event. Returns whether the application is still running.
    pub fn dispatch(&mut self, event: Event) -> bool {
        if self.outcome.is_some() {
            log::trace!("dropping {event:?}: application has ended");
            return false;
        }
        self.events.push(event);
        self.drive();
        self.is_running()
    }

    pub fn dispatch_window_event(&mut self, window_id: WindowId, event: WindowEvent) -> bool {
        self.dispatch(Event::Window { window_id, event })
    }

    /// Resizes a window as the host would and delivers the matching `Resized` event.
    pub fn resize_window(&mut self, window_id: WindowId, width: u32, height: u32) -> bool {
        let size = PhysicalSize::new(width, height);
        if let Some(window) = self.windows.get(&window_id) {
            window.host_resize(size);
        }
        self.dispatch_window_event(window_id, WindowEvent::Resized(size))
    }

    /// Moves the simulated clock forward, firing redraw drivers at each deadline on the
    /// way.
    pub fn advance(&mut self, by: Duration) {
        let end = self.now + by;
        while self.is_running() {
            match self.scheduler.next_deadline(self.now) {
                Some(deadline) if deadline <= end => {
                    self.now = self.now.max(deadline);
                    self.scheduler.fire_due(self.now);
                    self.drive();
                }
                _ => break,
            }
        }
        self.now = end;
    }

    /// Ends the native loop: delivers `LoopExiting`, then the end of the stream.
    pub fn close(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.events.push(Event::LoopExiting);
        self.events.close();
        self.drive();
    }

    /// Makes the next window creation fail with `reason`.
    pub fn reject_next_window(&mut self, reason: impl Into<String>) {
        self.reject_next_window = Some(reason.into());
    }

    pub fn window(&self, id: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&id)
    }

    /// Ids of every window created so far, in creation order.
    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn is_running(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
}
