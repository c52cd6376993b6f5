use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames-per-second meter over a sliding window (one second by default).
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    frames: VecDeque<Instant>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            frames: VecDeque::new(),
        }
    }

    /// Records a frame at `now` and returns the frame rate over the window.
    pub fn tick(&mut self, now: Instant) -> f64 {
        self.frames.push_back(now);
        while let Some(&front) = self.frames.front() {
            if now.duration_since(front) >= self.window {
                self.frames.pop_front();
            } else {
                break;
            }
        }
        self.fps()
    }

    /// Frames recorded within the window, normalized to one second.
    pub fn fps(&self) -> f64 {
        self.frames.len() as f64 / self.window.as_secs_f64()
    }

    pub fn frames_in_window(&self) -> usize {
        self.frames.len()
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
