//! Event model and the event pump.
//!
//! Native front ends push into an [`EventSender`]; application code consumes the
//! matching [`EventPump`] as an async stream.

mod pump;
mod types;

pub use pump::{EventPump, EventSender, RedrawSignal, channel};
pub use types::{DeviceEvent, Event, StartCause, Theme, WindowEvent};
