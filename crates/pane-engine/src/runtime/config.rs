use std::time::Duration;

/// Redraw driver period used when none is given: 60 Hz.
pub const DEFAULT_REDRAW_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Period of drivers started with [`Host::start_redraw_driver`](super::Host::start_redraw_driver).
    pub redraw_interval: Duration,

    /// Exit when the application is waiting and nothing holds the runtime alive.
    ///
    /// When `false` the runtime keeps running until the application future returns or
    /// the native loop exits.
    pub exit_when_idle: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            redraw_interval: DEFAULT_REDRAW_INTERVAL,
            exit_when_idle: true,
        }
    }
}
