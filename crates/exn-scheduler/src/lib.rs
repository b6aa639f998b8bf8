//! Background scheduling for recurring batch-download runs.
//!
//! [`TimeWindow`] computes the day's candidate run slots; the
//! [`BatchDownloadScheduler`] keeps exactly one future run queued with a
//! [`TaskRunner`] and re-arms itself after every completion, including runs
//! that failed or were expired by the runner.

mod error;
mod runner;
mod scheduler;
mod timing;

pub use error::{DownloadError, SchedulingError, TimingError};
pub use runner::{FiredTask, PendingRequest, TaskHandler, TaskRunner, TokioTaskRunner};
pub use scheduler::{
    AuthorizationCapability, BatchDownloadScheduler, DownloadScope, DownloadService,
};
pub use timing::TimeWindow;
