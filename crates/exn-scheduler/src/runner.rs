//! Task-runner contract and an in-process tokio implementation.
//!
//! The runner owns the set of pending requests; the scheduler only reads it
//! and submits new requests. Completion is single-fire by construction:
//! [`FiredTask::report_completion`] consumes the handle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::sync::{oneshot, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::SchedulingError;

/// A runner-tracked, not-yet-fired background task registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: Uuid,
    pub task_id: String,
    pub earliest_begin_date: DateTime<Utc>,
}

/// Handle passed to a task handler when its request fires.
pub struct FiredTask {
    completion: oneshot::Sender<bool>,
    expiration: CancellationToken,
}

impl FiredTask {
    /// Pairs a single-fire completion channel with an expiration token.
    /// Runner implementations build one of these per fired request.
    #[must_use]
    pub fn new(completion: oneshot::Sender<bool>, expiration: CancellationToken) -> Self {
        Self {
            completion,
            expiration,
        }
    }

    /// Report this run's outcome back to the runner.
    ///
    /// Consumes the handle, so completion can only ever be reported once per
    /// run. Must still be called after an expired run.
    pub fn report_completion(self, success: bool) {
        // The runner may have stopped listening; a dropped receiver is fine.
        let _ = self.completion.send(success);
    }

    /// Token the runner cancels when the run has exhausted its execution
    /// allowance. In-flight work should watch it and wind down cooperatively.
    #[must_use]
    pub fn expiration(&self) -> CancellationToken {
        self.expiration.clone()
    }
}

/// Boxed async task handler, invoked once per fired request.
pub type TaskHandler = Arc<dyn Fn(FiredTask) -> BoxFuture<'static, ()> + Send + Sync>;

/// External runner that owns durable task state.
///
/// Implementations track pending requests and fire registered handlers no
/// earlier than each request's begin date. The scheduler treats the pending
/// set as read-only truth and never cancels requests it did not submit.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Install the handler invoked whenever a request for `task_id` fires.
    /// Re-registering replaces the previous handler.
    async fn register_handler(&self, task_id: &str, handler: TaskHandler);

    /// Snapshot of the requests submitted but not yet fired.
    async fn pending_requests(&self) -> Vec<PendingRequest>;

    /// Queue one run of `task_id` no earlier than `earliest_begin_date`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError`] when the runner cannot accept the request.
    async fn submit(
        &self,
        task_id: &str,
        earliest_begin_date: DateTime<Utc>,
    ) -> Result<(), SchedulingError>;
}

/// In-process [`TaskRunner`] backed by spawned tokio timers.
///
/// Each submitted request sleeps until its begin date, leaves the pending
/// set, and invokes the registered handler. A watchdog cancels the run's
/// expiration token once the execution allowance elapses; the handler still
/// owns reporting completion after that.
pub struct TokioTaskRunner {
    execution_allowance: Duration,
    handlers: Arc<Mutex<HashMap<String, TaskHandler>>>,
    pending: Arc<Mutex<Vec<PendingRequest>>>,
}

impl TokioTaskRunner {
    #[must_use]
    pub fn new(execution_allowance: Duration) -> Self {
        Self {
            execution_allowance,
            handlers: Arc::new(Mutex::new(HashMap::new())),
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl TaskRunner for TokioTaskRunner {
    async fn register_handler(&self, task_id: &str, handler: TaskHandler) {
        self.handlers
            .lock()
            .await
            .insert(task_id.to_string(), handler);
    }

    async fn pending_requests(&self) -> Vec<PendingRequest> {
        self.pending.lock().await.clone()
    }

    async fn submit(
        &self,
        task_id: &str,
        earliest_begin_date: DateTime<Utc>,
    ) -> Result<(), SchedulingError> {
        if !self.handlers.lock().await.contains_key(task_id) {
            return Err(SchedulingError::UnknownTask(task_id.to_string()));
        }

        let request = PendingRequest {
            id: Uuid::new_v4(),
            task_id: task_id.to_string(),
            earliest_begin_date,
        };
        let delay = (earliest_begin_date - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        self.pending.lock().await.push(request.clone());

        let handlers = Arc::clone(&self.handlers);
        let pending = Arc::clone(&self.pending);
        let allowance = self.execution_allowance;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.lock().await.retain(|r| r.id != request.id);

            let handler = handlers.lock().await.get(&request.task_id).cloned();
            let Some(handler) = handler else {
                tracing::warn!(task_id = %request.task_id, "task runner: handler unregistered before fire");
                return;
            };

            let (completion_tx, completion_rx) = oneshot::channel();
            let expiration = CancellationToken::new();
            tokio::spawn(handler(FiredTask::new(completion_tx, expiration.clone())));

            let watchdog = tokio::spawn({
                let expiration = expiration.clone();
                let task_id = request.task_id.clone();
                async move {
                    tokio::time::sleep(allowance).await;
                    tracing::warn!(task_id = %task_id, "task runner: execution allowance exceeded, signalling expiration");
                    expiration.cancel();
                }
            });

            // A handler that drops its FiredTask without reporting counts
            // as a failed run.
            let success = completion_rx.await.unwrap_or(false);
            watchdog.abort();
            tracing::debug!(task_id = %request.task_id, success, "task runner: run completed");
        });

        Ok(())
    }
}
