//! Time subsystem.
//!
//! Deadline scheduling for redraw drivers and an FPS meter for render loops. Both take
//! `now` explicitly so they run unchanged under the headless runtime's simulated clock.

mod fps;
mod interval;

pub use fps::FpsCounter;
pub use interval::{Interval, MIN_PERIOD};
