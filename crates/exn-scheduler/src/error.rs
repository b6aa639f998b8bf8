use chrono::NaiveTime;
use thiserror::Error;

/// Errors from constructing a [`crate::TimeWindow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    /// The window start does not precede the window end within the same day.
    #[error("window start {start} must precede window end {end}")]
    InvertedWindow { start: NaiveTime, end: NaiveTime },

    /// The slot interval is zero.
    #[error("slot interval must be at least one hour")]
    ZeroInterval,
}

/// Errors from submitting a task request to a [`crate::TaskRunner`].
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// No handler has been registered under the given task identifier.
    #[error("no handler registered for task {0}")]
    UnknownTask(String),

    /// The runner refused to queue the request.
    #[error("task runner rejected the request: {0}")]
    Rejected(String),
}

/// Errors from a batch-download run.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The run was cancelled cooperatively before it finished, typically
    /// because the task runner signalled expiration.
    #[error("batch download was cancelled before completion")]
    Cancelled,

    /// The download or ingestion itself failed.
    #[error("batch download failed: {0}")]
    Failed(String),
}
