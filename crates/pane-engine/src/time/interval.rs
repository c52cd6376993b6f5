use std::time::{Duration, Instant};

/// Smallest period an [`Interval`] accepts.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Fixed-rate deadline schedule.
///
/// The first deadline is one period after the schedule is first observed. When ticks
/// are missed (a stalled loop, a debugger), they are skipped rather than replayed.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            next: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Next deadline, starting the schedule at `now` if it has not started yet.
    pub fn next_deadline(&mut self, now: Instant) -> Instant {
        *self.next.get_or_insert(now + self.period)
    }

    /// Returns `true` if a tick is due at `now` and moves to the next future deadline.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let deadline = self.next_deadline(now);
        if now < deadline {
            return false;
        }

        let behind = now.duration_since(deadline);
        let skipped = behind.as_nanos() / self.period.as_nanos();
        let next = u32::try_from(skipped + 1)
            .ok()
            .and_then(|steps| self.period.checked_mul(steps))
            .and_then(|offset| deadline.checked_add(offset))
            .unwrap_or(now + self.period);
        self.next = Some(next);
        true
    }

    /// Forgets the schedule; the next observation starts a fresh one.
    pub fn reset(&mut self) {
        self.next = None;
    }
}
