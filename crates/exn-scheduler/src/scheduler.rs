//! Coordinator that keeps one recurring batch-download run queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::error::DownloadError;
use crate::runner::{FiredTask, TaskHandler, TaskRunner};
use crate::timing::TimeWindow;

/// Gates whether background scheduling may proceed. Absence of authorization
/// is a deferred state, never an error.
pub trait AuthorizationCapability: Send + Sync {
    fn is_authorized(&self) -> bool;
}

/// Which exposure-key batches a download run should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadScope {
    All,
    SevenDays,
}

impl std::fmt::Display for DownloadScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadScope::All => write!(f, "all"),
            DownloadScope::SevenDays => write!(f, "seven-days"),
        }
    }
}

/// Download-and-ingest collaborator driven by each scheduled run.
#[async_trait]
pub trait DownloadService: Send + Sync {
    /// Download and ingest the batches for `scope`.
    ///
    /// Implementations must watch `cancel` and wind down promptly once it
    /// fires, resolving to [`DownloadError::Cancelled`]. The returned result
    /// is delivered exactly once either way.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] when the run fails or is cancelled.
    async fn start_batch_download(
        &self,
        scope: DownloadScope,
        cancel: CancellationToken,
    ) -> Result<(), DownloadError>;
}

/// Keeps exactly one future batch-download run queued with the task runner.
///
/// All durable state lives in the runner; the scheduler recomputes its
/// decisions from the runner's pending set and the [`TimeWindow`] on every
/// arming attempt. Collaborators are injected and externally owned.
pub struct BatchDownloadScheduler {
    task_id: String,
    window: TimeWindow,
    runner: Arc<dyn TaskRunner>,
    authorization: Arc<dyn AuthorizationCapability>,
    downloads: Arc<dyn DownloadService>,
    registered: AtomicBool,
}

impl BatchDownloadScheduler {
    #[must_use]
    pub fn new(
        task_id: impl Into<String>,
        window: TimeWindow,
        runner: Arc<dyn TaskRunner>,
        authorization: Arc<dyn AuthorizationCapability>,
        downloads: Arc<dyn DownloadService>,
    ) -> Arc<Self> {
        Arc::new(Self {
            task_id: task_id.into(),
            window,
            runner,
            authorization,
            downloads,
            registered: AtomicBool::new(false),
        })
    }

    /// Install the recurring task handler and arm the first run.
    ///
    /// Idempotent: repeated calls neither re-register the handler nor
    /// duplicate execution.
    pub async fn register(self: Arc<Self>) {
        if self.registered.swap(true, Ordering::SeqCst) {
            return;
        }

        let scheduler = Arc::clone(&self);
        let handler: TaskHandler = Arc::new(move |task: FiredTask| {
            let scheduler = Arc::clone(&scheduler);
            Box::pin(async move { scheduler.on_task_fired(task).await })
        });

        self.runner.register_handler(&self.task_id, handler).await;
        self.arm_next_run_if_needed().await;
    }

    /// One fired run: download, report completion, then re-arm.
    ///
    /// Arming is sequenced strictly after completion is reported, and happens
    /// regardless of the run's outcome; a failed or expired run must not
    /// block future scheduling.
    async fn on_task_fired(&self, task: FiredTask) {
        let cancel = task.expiration();
        let result = self
            .downloads
            .start_batch_download(DownloadScope::All, cancel)
            .await;

        match &result {
            Ok(()) => {
                tracing::info!(task_id = %self.task_id, "scheduler: batch download run completed");
            }
            Err(DownloadError::Cancelled) => {
                tracing::warn!(task_id = %self.task_id, "scheduler: batch download run expired before completion");
            }
            Err(e) => {
                tracing::error!(task_id = %self.task_id, error = %e, "scheduler: batch download run failed");
            }
        }

        task.report_completion(result.is_ok());
        self.arm_next_run_if_needed().await;
    }

    /// Queue the next run for today unless one is already pending.
    ///
    /// No-op without authorization. A submission failure is logged and
    /// swallowed; the next natural trigger retries.
    pub async fn arm_next_run_if_needed(&self) {
        self.arm_next_run_at(Utc::now()).await;
    }

    async fn arm_next_run_at(&self, now: DateTime<Utc>) {
        if !self.authorization.is_authorized() {
            tracing::debug!(task_id = %self.task_id, "scheduler: exposure processing not authorized, deferring");
            return;
        }

        let pending = self.runner.pending_requests().await;
        if !pending.is_empty() {
            return;
        }

        let Some(slot) = self
            .window
            .next_slot_to_schedule(now.date_naive(), &pending, now)
        else {
            tracing::debug!(task_id = %self.task_id, "scheduler: no schedulable slot left today");
            return;
        };

        match self.runner.submit(&self.task_id, slot).await {
            Ok(()) => {
                tracing::debug!(task_id = %self.task_id, slot = %slot, "scheduler: background task scheduled");
            }
            Err(e) => {
                tracing::error!(task_id = %self.task_id, error = %e, "scheduler: unable to schedule background task");
            }
        }
    }
}
