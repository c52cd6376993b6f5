use super::WindowId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    /// The windowing host refused to create the window (e.g. no display).
    #[error("failed to create window: {0}")]
    Creation(String),

    /// A native call on an existing window was rejected.
    #[error("window operation `{op}` failed: {reason}")]
    Operation { op: &'static str, reason: String },

    /// The window was used after `close`.
    #[error("{0} has been closed")]
    Closed(WindowId),
}

impl WindowError {
    pub(crate) fn operation(op: &'static str, reason: impl ToString) -> Self {
        Self::Operation {
            op,
            reason: reason.to_string(),
        }
    }
}
