use std::future::Future;
use std::time::Instant;

use super::{Host, Liveness, LocalExecutor, Notify, RuntimeConfig, Turn};
use crate::event::{EventPump, EventSender};
use crate::window::{NativeWindow, WindowError, WindowOptions};

/// State of the application after a drive.
#[derive(Debug)]
pub enum Progress {
    Running,
    Finished(anyhow::Result<()>),
    /// Waiting with nothing left to wake it.
    Idle,
}

/// Couples the executor with the host it services. Shared by both front ends.
pub(crate) struct Scheduler<W: NativeWindow> {
    executor: LocalExecutor,
    host: Host<W>,
    exit_when_idle: bool,
}

impl<W: NativeWindow + 'static> Scheduler<W> {
    pub(crate) fn new<F, Fut>(
        config: &RuntimeConfig,
        events: EventSender,
        pump: EventPump,
        notify: Option<Notify>,
        app: F,
    ) -> Self
    where
        F: FnOnce(Host<W>, EventPump) -> Fut,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        let liveness = Liveness::new();
        let host = Host::new(events, liveness.clone(), config);
        let task = app(host.clone(), pump);
        Self {
            executor: LocalExecutor::with_notify(task, liveness, notify),
            host,
            exit_when_idle: config.exit_when_idle,
        }
    }

    /// Polls the application until it parks, servicing host calls in between.
    pub(crate) fn drive(
        &mut self,
        create: &mut dyn FnMut(&WindowOptions) -> Result<W, WindowError>,
    ) -> Progress {
        loop {
            match self.executor.poll() {
                Turn::Ready(result) => return Progress::Finished(result),
                Turn::Idle if self.exit_when_idle => return Progress::Idle,
                Turn::Idle => return Progress::Running,
                Turn::Parked => {
                    let serviced = self.host.service_commands(create);
                    if serviced == 0 && !self.executor.is_woken() {
                        return Progress::Running;
                    }
                }
            }
        }
    }

    pub(crate) fn next_deadline(&self, now: Instant) -> Option<Instant> {
        self.host.next_deadline(now)
    }

    pub(crate) fn fire_due(&self, now: Instant) -> usize {
        self.host.fire_due(now)
    }
}
