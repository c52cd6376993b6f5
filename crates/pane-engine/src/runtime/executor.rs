use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, ThreadId};

use futures::future::{FutureExt, LocalBoxFuture};

/// Count of outstanding reasons to keep the runtime alive.
///
/// Cloning shares the count.
#[derive(Debug, Clone, Default)]
pub struct Liveness {
    refs: Rc<Cell<usize>>,
}

impl Liveness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.refs.get()
    }

    pub fn hold(&self) -> KeepAlive {
        self.refs.set(self.refs.get() + 1);
        KeepAlive {
            refs: self.refs.clone(),
        }
    }
}

/// Guard holding one liveness reference until dropped.
#[derive(Debug)]
#[must_use = "the runtime may exit as soon as the guard is dropped"]
pub struct KeepAlive {
    refs: Rc<Cell<usize>>,
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.refs.set(self.refs.get().saturating_sub(1));
    }
}

/// Hook for interrupting a sleeping host loop.
pub type Notify = Box<dyn Fn() + Send + Sync>;

struct TaskWaker {
    woken: AtomicBool,
    owner: ThreadId,
    /// Called for wakes from other threads, so a sleeping host loop gets interrupted.
    notify: Option<Notify>,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.woken.store(true, Ordering::Release);
        if thread::current().id() != self.owner {
            if let Some(notify) = &self.notify {
                notify();
            }
        }
    }
}

/// Result of one executor turn.
#[derive(Debug)]
pub enum Turn {
    /// The task completed.
    Ready(anyhow::Result<()>),
    /// The task is waiting on something that is still referenced.
    Parked,
    /// The task is waiting and nothing can wake it: no wake is pending and liveness is
    /// zero. Also returned once the task has completed.
    Idle,
}

/// Single-task cooperative executor for the application future.
pub struct LocalExecutor {
    task: Option<LocalBoxFuture<'static, anyhow::Result<()>>>,
    waker: Arc<TaskWaker>,
    liveness: Liveness,
}

impl LocalExecutor {
    pub fn new<F>(task: F, liveness: Liveness) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self::with_notify(task, liveness, None)
    }

    pub fn with_notify<F>(task: F, liveness: Liveness, notify: Option<Notify>) -> Self
    where
        F: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self {
            task: Some(task.boxed_local()),
            waker: Arc::new(TaskWaker {
                // Runs on the first turn.
                woken: AtomicBool::new(true),
                owner: thread::current().id(),
                notify,
            }),
            liveness,
        }
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn is_woken(&self) -> bool {
        self.waker.woken.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_none()
    }

    /// Polls the task if it was woken since the last turn.
    pub fn poll(&mut self) -> Turn {
        let Some(task) = self.task.as_mut() else {
            return Turn::Idle;
        };

        if self.waker.woken.swap(false, Ordering::AcqRel) {
            let waker = Waker::from(self.waker.clone());
            let mut cx = Context::from_waker(&waker);
            if let Poll::Ready(result) = task.as_mut().poll(&mut cx) {
                self.task = None;
                return Turn::Ready(result);
            }
        }

        if self.is_woken() || self.liveness.count() > 0 {
            Turn::Parked
        } else {
            Turn::Idle
        }
    }
}
