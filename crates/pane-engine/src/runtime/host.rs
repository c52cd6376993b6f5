use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use futures::channel::oneshot;

use super::{KeepAlive, Liveness, RuntimeConfig};
use crate::event::{EventSender, RedrawSignal};
use crate::time::Interval;
use crate::window::{NativeWindow, Window, WindowError, WindowId, WindowOptions};

pub(crate) enum HostCommand<W: NativeWindow> {
    CreateWindow {
        options: WindowOptions,
        reply: oneshot::Sender<Result<Window<W>, WindowError>>,
        _keep_alive: KeepAlive,
    },
}

struct HostShared<W: NativeWindow> {
    commands: RefCell<VecDeque<HostCommand<W>>>,
    drivers: RefCell<Vec<Weak<DriverState>>>,
    liveness: Liveness,
    events: EventSender,
    redraw_interval: Duration,
}

/// Application-side access to the runtime.
///
/// Asynchronous host calls are queued here and serviced by the runtime between polls of
/// the application future; each queued call keeps the runtime alive until answered.
pub struct Host<W: NativeWindow> {
    shared: Rc<HostShared<W>>,
}

impl<W: NativeWindow> Clone for Host<W> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<W: NativeWindow> Host<W> {
    pub(crate) fn new(events: EventSender, liveness: Liveness, config: &RuntimeConfig) -> Self {
        Self {
            shared: Rc::new(HostShared {
                commands: RefCell::new(VecDeque::new()),
                drivers: RefCell::new(Vec::new()),
                liveness,
                events,
                redraw_interval: config.redraw_interval,
            }),
        }
    }

    /// Opens a window.
    pub async fn create_window(&self, options: WindowOptions) -> Result<Window<W>, WindowError> {
        let (reply, rx) = oneshot::channel();
        self.shared
            .commands
            .borrow_mut()
            .push_back(HostCommand::CreateWindow {
                options,
                reply,
                _keep_alive: self.shared.liveness.hold(),
            });

        rx.await.map_err(|_| {
            WindowError::Creation("runtime stopped before the window was created".to_string())
        })?
    }

    /// Starts a redraw driver with the configured interval (60 Hz by default).
    pub fn start_redraw_driver(&self) -> RedrawDriver {
        self.start_redraw_driver_every(self.shared.redraw_interval)
    }

    /// Starts a driver that requests a redraw of every tracked window each `interval`.
    ///
    /// The driver keeps the runtime alive until stopped or dropped.
    pub fn start_redraw_driver_every(&self, interval: Duration) -> RedrawDriver {
        let state = Rc::new(DriverState {
            interval: RefCell::new(Interval::new(interval)),
            tracked: RefCell::new(Vec::new()),
            keep_alive: RefCell::new(Some(self.shared.liveness.hold())),
        });
        self.shared.drivers.borrow_mut().push(Rc::downgrade(&state));
        log::debug!("redraw driver started ({interval:?})");
        RedrawDriver { state }
    }

    /// Keeps the runtime alive while the guard exists.
    pub fn keep_alive(&self) -> KeepAlive {
        self.shared.liveness.hold()
    }

    pub fn events(&self) -> &EventSender {
        &self.shared.events
    }

    // ── runtime side ──────────────────────────────────────────────────────

    /// Answers queued host calls. Returns the number serviced.
    pub(crate) fn service_commands(
        &self,
        create: &mut dyn FnMut(&WindowOptions) -> Result<W, WindowError>,
    ) -> usize {
        let mut serviced = 0;
        loop {
            let Some(command) = self.shared.commands.borrow_mut().pop_front() else {
                break;
            };
            match command {
                HostCommand::CreateWindow {
                    options,
                    reply,
                    _keep_alive,
                } => {
                    let result = create(&options).map(|native| {
                        let id = native.id();
                        Window::new(native, self.shared.events.redraw_signal(id))
                    });
                    match &result {
                        Ok(window) => log::debug!("created {} \"{}\"", window.id(), options.title),
                        Err(err) => log::error!("window creation failed: {err}"),
                    }
                    if reply.send(result).is_err() {
                        log::debug!("window created for a caller that went away");
                    }
                }
            }
            serviced += 1;
        }
        serviced
    }

    fn running_drivers(&self) -> Vec<Rc<DriverState>> {
        let mut drivers = self.shared.drivers.borrow_mut();
        drivers.retain(|d| d.upgrade().is_some_and(|s| s.is_running()));
        drivers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Earliest deadline among running drivers. Starts schedules not yet observed.
    pub(crate) fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.running_drivers()
            .iter()
            .map(|d| d.interval.borrow_mut().next_deadline(now))
            .min()
    }

    /// Raises redraw signals for drivers due at `now`. Returns the number of new
    /// `RedrawRequested` events queued.
    pub(crate) fn fire_due(&self, now: Instant) -> usize {
        let mut raised = 0;
        for driver in self.running_drivers() {
            if driver.interval.borrow_mut().poll_due(now) {
                raised += driver
                    .tracked
                    .borrow()
                    .iter()
                    .filter(|signal| signal.raise())
                    .count();
            }
        }
        raised
    }
}

struct DriverState {
    interval: RefCell<Interval>,
    tracked: RefCell<Vec<RedrawSignal>>,
    keep_alive: RefCell<Option<KeepAlive>>,
}

impl DriverState {
    fn is_running(&self) -> bool {
        self.keep_alive.borrow().is_some()
    }
}

/// Periodic redraw requests for a set of windows.
///
/// Stopped by [`stop`](Self::stop) or by dropping it.
pub struct RedrawDriver {
    state: Rc<DriverState>,
}

impl RedrawDriver {
    pub fn track<W: NativeWindow>(&self, window: &Window<W>) {
        let signal = window.redraw_signal();
        let mut tracked = self.state.tracked.borrow_mut();
        if !tracked.iter().any(|s| s.window_id() == signal.window_id()) {
            tracked.push(signal);
        }
    }

    pub fn untrack(&self, id: WindowId) {
        self.state
            .tracked
            .borrow_mut()
            .retain(|s| s.window_id() != id);
    }

    pub fn tracked(&self) -> Vec<WindowId> {
        self.state
            .tracked
            .borrow()
            .iter()
            .map(RedrawSignal::window_id)
            .collect()
    }

    pub fn interval(&self) -> Duration {
        self.state.interval.borrow().period()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn stop(&self) {
        if self.state.keep_alive.borrow_mut().take().is_some() {
            log::debug!("redraw driver stopped");
        }
    }
}

impl Drop for RedrawDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RedrawDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawDriver")
            .field("interval", &self.interval())
            .field("tracked", &self.tracked())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, channel};
    use crate::window::HeadlessWindow;

    const MS: Duration = Duration::from_millis(1);

    fn host() -> (Host<HeadlessWindow>, crate::event::EventPump, Liveness) {
        let (tx, pump) = channel();
        let liveness = Liveness::new();
        let host = Host::new(tx, liveness.clone(), &RuntimeConfig::default());
        (host, pump, liveness)
    }

    fn window(host: &Host<HeadlessWindow>, id: u64) -> Window<HeadlessWindow> {
        let id = WindowId::from_raw(id);
        Window::new(
            HeadlessWindow::new(id, &WindowOptions::default()),
            host.events().redraw_signal(id),
        )
    }

    #[test]
    fn driver_holds_liveness_until_stopped() {
        let (host, _pump, liveness) = host();
        let driver = host.start_redraw_driver();
        assert_eq!(liveness.count(), 1);
        assert_eq!(driver.interval(), crate::runtime::DEFAULT_REDRAW_INTERVAL);

        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(liveness.count(), 0);

        let other = host.start_redraw_driver();
        drop(other);
        assert_eq!(liveness.count(), 0);
    }

    #[test]
    fn due_driver_raises_each_tracked_window_once() {
        let (host, mut pump, _liveness) = host();
        let a = window(&host, 1);
        let b = window(&host, 2);
        let driver = host.start_redraw_driver_every(10 * MS);
        driver.track(&a);
        driver.track(&b);
        driver.track(&a);
        assert_eq!(driver.tracked(), vec![a.id(), b.id()]);

        let t0 = Instant::now();
        assert_eq!(host.next_deadline(t0), Some(t0 + 10 * MS));
        assert_eq!(host.fire_due(t0 + 5 * MS), 0);
        assert_eq!(host.fire_due(t0 + 10 * MS), 2);
        // Undelivered requests absorb the next tick.
        assert_eq!(host.fire_due(t0 + 20 * MS), 0);

        assert_eq!(pump.try_next_event(), Some(Event::RedrawRequested(a.id())));
        assert_eq!(pump.try_next_event(), Some(Event::RedrawRequested(b.id())));
        assert_eq!(pump.try_next_event(), None);
    }

    #[test]
    fn stopped_drivers_have_no_deadline() {
        let (host, _pump, _liveness) = host();
        let driver = host.start_redraw_driver_every(10 * MS);
        driver.stop();
        assert_eq!(host.next_deadline(Instant::now()), None);
    }

    #[test]
    fn untracked_windows_are_not_raised() {
        let (host, mut pump, _liveness) = host();
        let a = window(&host, 1);
        let driver = host.start_redraw_driver_every(10 * MS);
        driver.track(&a);
        driver.untrack(a.id());

        let t0 = Instant::now();
        host.next_deadline(t0);
        assert_eq!(host.fire_due(t0 + 10 * MS), 0);
        assert_eq!(pump.try_next_event(), None);
    }

    #[test]
    fn create_window_is_answered_by_service() {
        let (host, _pump, liveness) = host();
        let mut fut = Box::pin(host.create_window(WindowOptions::new("x").with_size(320, 200)));

        let waker = std::task::Waker::noop();
        let mut cx = std::task::Context::from_waker(waker);
        assert!(fut.as_mut().poll(&mut cx).is_pending());
        assert_eq!(liveness.count(), 1);

        let mut next = 10;
        let serviced = host.service_commands(&mut |opts| {
            next += 1;
            Ok(HeadlessWindow::new(WindowId::from_raw(next), opts))
        });
        assert_eq!(serviced, 1);
        assert_eq!(liveness.count(), 0);

        match fut.as_mut().poll(&mut cx) {
            std::task::Poll::Ready(Ok(window)) => {
                assert_eq!(window.id(), WindowId::from_raw(11));
                assert_eq!(window.size().unwrap(), winit::dpi::PhysicalSize::new(320, 200));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
