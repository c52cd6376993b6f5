use crate::resource::RegistryError;
use crate::window::WindowError;

/// Why the native surface refused to hand out a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AcquireFailure {
    #[error("timed out waiting for a frame")]
    Timeout,
    #[error("surface is outdated and must be reconfigured")]
    Outdated,
    #[error("surface was lost")]
    Lost,
    #[error("out of memory")]
    OutOfMemory,
    #[error("unspecified acquisition failure")]
    Other,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// Zero-sized or unsupported configuration, or the native surface rejected it.
    #[error("invalid surface configuration: {0}")]
    Configuration(String),

    #[error("failed to acquire the current texture: {0}")]
    Acquisition(AcquireFailure),

    #[error("present called without an acquired frame")]
    NothingToPresent,

    #[error("surface is not configured")]
    NotConfigured,

    #[error("surface has been destroyed")]
    Destroyed,

    /// The frame was presented or invalidated by a configure.
    #[error("frame generation {0} is no longer current")]
    StaleFrame(u64),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Window(#[from] WindowError),
}

/// How a render loop should react to a [`SurfaceError`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Configure the surface again (with the current window size) and retry next frame.
    Reconfigure,
    /// Transient; drop this frame.
    SkipFrame,
    /// Unrecoverable; shut down.
    Fatal,
}

impl SurfaceError {
    pub fn action(&self) -> SurfaceErrorAction {
        match self {
            SurfaceError::Acquisition(AcquireFailure::Lost | AcquireFailure::Outdated)
            | SurfaceError::NotConfigured => SurfaceErrorAction::Reconfigure,
            SurfaceError::Acquisition(AcquireFailure::OutOfMemory)
            | SurfaceError::Destroyed
            | SurfaceError::Registry(_)
            | SurfaceError::Window(_) => SurfaceErrorAction::Fatal,
            SurfaceError::Acquisition(AcquireFailure::Timeout | AcquireFailure::Other)
            | SurfaceError::Configuration(_)
            | SurfaceError::NothingToPresent
            | SurfaceError::StaleFrame(_) => SurfaceErrorAction::SkipFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions() {
        assert_eq!(
            SurfaceError::Acquisition(AcquireFailure::Outdated).action(),
            SurfaceErrorAction::Reconfigure
        );
        assert_eq!(
            SurfaceError::Acquisition(AcquireFailure::OutOfMemory).action(),
            SurfaceErrorAction::Fatal
        );
        assert_eq!(
            SurfaceError::Acquisition(AcquireFailure::Timeout).action(),
            SurfaceErrorAction::SkipFrame
        );
        assert_eq!(SurfaceError::Destroyed.action(), SurfaceErrorAction::Fatal);
    }
}
