use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::stream::{FusedStream, Stream, StreamExt};

use super::Event;
use crate::window::WindowId;

#[derive(Debug, Default)]
struct Shared {
    queue: VecDeque<Event>,
    /// Windows with a `RedrawRequested` currently sitting in `queue`.
    redraw_pending: HashSet<WindowId>,
    closed: bool,
    waker: Option<Waker>,
}

impl Shared {
    fn wake(&mut self) {
        if let Some(w) = self.waker.take() {
            w.wake();
        }
    }
}

/// Creates a connected sender/pump pair.
///
/// The pump is the only consumer; it cannot be cloned or restarted.
pub fn channel() -> (EventSender, EventPump) {
    let shared = Rc::new(RefCell::new(Shared::default()));
    (
        EventSender {
            shared: shared.clone(),
        },
        EventPump { shared },
    )
}

/// Native side of the event pump.
#[derive(Debug, Clone)]
pub struct EventSender {
    shared: Rc<RefCell<Shared>>,
}

impl EventSender {
    /// Appends a native event. Ignored once the stream has ended.
    pub fn push(&self, event: Event) {
        if let Event::RedrawRequested(id) = event {
            self.request_redraw(id);
            return;
        }

        let mut shared = self.shared.borrow_mut();
        if shared.closed {
            log::trace!("dropping event after end of stream: {event:?}");
            return;
        }
        shared.queue.push_back(event);
        shared.wake();
    }

    /// Raises the redraw signal for `id`.
    ///
    /// Level-triggered: while a redraw for `id` is queued and undelivered, further
    /// requests are absorbed. Returns `true` if a new event was queued.
    pub fn request_redraw(&self, id: WindowId) -> bool {
        let mut shared = self.shared.borrow_mut();
        if shared.closed || !shared.redraw_pending.insert(id) {
            return false;
        }
        shared.queue.push_back(Event::RedrawRequested(id));
        shared.wake();
        true
    }

    /// Ends the stream. Already queued events are still delivered.
    pub fn close(&self) {
        let mut shared = self.shared.borrow_mut();
        shared.closed = true;
        shared.wake();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.borrow().closed
    }

    /// Number of events waiting to be fetched.
    pub fn pending(&self) -> usize {
        self.shared.borrow().queue.len()
    }

    pub(crate) fn redraw_signal(&self, id: WindowId) -> RedrawSignal {
        RedrawSignal {
            id,
            sender: self.clone(),
        }
    }
}

/// Per-window handle for raising redraw requests.
#[derive(Debug, Clone)]
pub struct RedrawSignal {
    id: WindowId,
    sender: EventSender,
}

impl RedrawSignal {
    pub fn window_id(&self) -> WindowId {
        self.id
    }

    pub fn raise(&self) -> bool {
        self.sender.request_redraw(self.id)
    }
}

/// Stream of events pulled one at a time from the native source.
///
/// A pending fetch only parks a waker. It holds no liveness reference, so awaiting
/// the pump never keeps the runtime alive on its own.
#[derive(Debug)]
pub struct EventPump {
    shared: Rc<RefCell<Shared>>,
}

impl EventPump {
    /// Waits for the next event. Resolves to `None` once the native loop has exited.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.next().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_next_event(&mut self) -> Option<Event> {
        let mut shared = self.shared.borrow_mut();
        pop(&mut shared)
    }
}

fn pop(shared: &mut Shared) -> Option<Event> {
    let event = shared.queue.pop_front()?;
    if let Event::RedrawRequested(id) = event {
        shared.redraw_pending.remove(&id);
    }
    Some(event)
}

impl Stream for EventPump {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        let mut shared = self.shared.borrow_mut();
        if let Some(event) = pop(&mut shared) {
            return Poll::Ready(Some(event));
        }
        if shared.closed {
            return Poll::Ready(None);
        }
        shared.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl FusedStream for EventPump {
    fn is_terminated(&self) -> bool {
        let shared = self.shared.borrow();
        shared.closed && shared.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::Wake;

    use super::*;
    use crate::event::WindowEvent;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn focused(id: u64) -> Event {
        Event::Window {
            window_id: WindowId::from_raw(id),
            event: WindowEvent::Focused(true),
        }
    }

    // ── ordering ──────────────────────────────────────────────────────────

    #[test]
    fn delivers_in_arrival_order() {
        let (tx, mut pump) = channel();
        let id = WindowId::from_raw(1);

        tx.push(focused(1));
        tx.request_redraw(id);
        tx.push(Event::MainEventsCleared);

        assert_eq!(pump.try_next_event(), Some(focused(1)));
        assert_eq!(pump.try_next_event(), Some(Event::RedrawRequested(id)));
        assert_eq!(pump.try_next_event(), Some(Event::MainEventsCleared));
        assert_eq!(pump.try_next_event(), None);
    }

    #[test]
    fn resizes_are_not_coalesced() {
        let (tx, mut pump) = channel();
        let id = WindowId::from_raw(1);
        for w in [100, 200, 300] {
            tx.push(Event::Window {
                window_id: id,
                event: WindowEvent::Resized(winit::dpi::PhysicalSize::new(w, 50)),
            });
        }

        assert_eq!(tx.pending(), 3);
        let mut widths = Vec::new();
        while let Some(Event::Window {
            event: WindowEvent::Resized(size),
            ..
        }) = pump.try_next_event()
        {
            widths.push(size.width);
        }
        assert_eq!(widths, vec![100, 200, 300]);
    }

    // ── redraw coalescing ─────────────────────────────────────────────────

    #[test]
    fn redraw_requests_coalesce_until_delivered() {
        let (tx, mut pump) = channel();
        let id = WindowId::from_raw(9);

        assert!(tx.request_redraw(id));
        assert!(!tx.request_redraw(id));
        assert!(!tx.request_redraw(id));
        assert_eq!(tx.pending(), 1);

        assert_eq!(pump.try_next_event(), Some(Event::RedrawRequested(id)));

        // Delivered: the signal is armed again.
        assert!(tx.request_redraw(id));
        assert_eq!(pump.try_next_event(), Some(Event::RedrawRequested(id)));
    }

    #[test]
    fn pushed_redraw_events_go_through_the_signal() {
        let (tx, _pump) = channel();
        let id = WindowId::from_raw(2);

        tx.push(Event::RedrawRequested(id));
        tx.push(Event::RedrawRequested(id));
        assert_eq!(tx.pending(), 1);
    }

    #[test]
    fn redraw_signals_are_per_window() {
        let (tx, _pump) = channel();
        let a = tx.redraw_signal(WindowId::from_raw(1));
        let b = tx.redraw_signal(WindowId::from_raw(2));

        assert!(a.raise());
        assert!(b.raise());
        assert!(!a.raise());
        assert_eq!(tx.pending(), 2);
    }

    // ── end of stream / wakeups ───────────────────────────────────────────

    #[test]
    fn close_drains_then_ends() {
        let (tx, mut pump) = channel();
        tx.push(Event::Resumed);
        tx.close();
        tx.push(Event::Suspended);

        assert!(!pump.is_terminated());
        assert_eq!(pump.try_next_event(), Some(Event::Resumed));
        assert!(pump.is_terminated());

        let waker = Waker::noop();
        let mut cx = Context::from_waker(waker);
        assert_eq!(Pin::new(&mut pump).poll_next(&mut cx), Poll::Ready(None));
        assert_eq!(Pin::new(&mut pump).poll_next(&mut cx), Poll::Ready(None));
    }

    #[test]
    fn pending_fetch_is_woken_by_push() {
        let (tx, mut pump) = channel();
        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(counter.clone());
        let mut cx = Context::from_waker(&waker);

        assert_eq!(Pin::new(&mut pump).poll_next(&mut cx), Poll::Pending);
        assert_eq!(counter.0.load(Ordering::SeqCst), 0);

        tx.push(Event::Resumed);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            Pin::new(&mut pump).poll_next(&mut cx),
            Poll::Ready(Some(Event::Resumed))
        );
    }

    #[test]
    fn closed_sender_ignores_redraws() {
        let (tx, mut pump) = channel();
        tx.close();
        assert!(!tx.request_redraw(WindowId::from_raw(1)));
        assert_eq!(pump.try_next_event(), None);
        assert!(tx.is_closed());
    }
}
