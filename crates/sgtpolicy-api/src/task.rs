// Task polling
//
// Every mutating call returns a `TaskReference`; the controller executes
// the change asynchronously. These methods poll `/api/v1/task/{id}` at a
// fixed interval until the task reaches a terminal state (error flagged,
// or end time present) or a wall-clock timeout elapses.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use crate::client::DnacClient;
use crate::error::Error;
use crate::models::{Task, TaskReference};

/// Interval between task status fetches.
pub const TASK_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default wall-clock budget for a single task wait.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(360);
/// Default number of whole-wait attempts in [`DnacClient::wait_for_task_with_retries`].
pub const DEFAULT_WAIT_ATTEMPTS: u32 = 2;

/// Interval between task-tree fetches while waiting for CFS provisioning.
const CFS_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Maximum number of tree fetches before giving up on CFS completion.
const CFS_MAX_CHECKS: u32 = 60;

impl DnacClient {
    /// Fetch the current status of a task.
    ///
    /// `GET /api/v1/task/{id}`
    pub async fn get_task(&self, task_id: &str) -> Result<Task, Error> {
        self.get(&format!("/v1/task/{task_id}")).await
    }

    /// Fetch the full task tree (a task plus its child tasks).
    ///
    /// `GET /api/v1/task/{id}/tree`
    pub async fn get_task_tree(&self, task_id: &str) -> Result<Vec<Task>, Error> {
        self.get(&format!("/v1/task/{task_id}/tree")).await
    }

    /// Poll until the task reaches a terminal state.
    ///
    /// Returns the terminal [`Task`] whether it succeeded or failed --
    /// callers inspect [`Task::is_failed`] (or use
    /// [`wait_for_task_success`](Self::wait_for_task_success)). Polls
    /// every [`TASK_POLL_INTERVAL`]; once the wall clock exceeds
    /// `timeout` the wait ends with [`Error::TaskTimeout`].
    pub async fn wait_for_task(
        &self,
        task: &TaskReference,
        timeout: Duration,
    ) -> Result<Task, Error> {
        let start = Instant::now();
        debug!(task_id = %task.task_id, ?timeout, "waiting for task");

        loop {
            if start.elapsed() > timeout {
                return Err(Error::TaskTimeout {
                    task_id: task.task_id.clone(),
                    timeout_secs: timeout.as_secs(),
                });
            }

            let status = self.get_task(&task.task_id).await?;
            if status.is_complete() {
                debug!(task_id = %status.id, failed = status.is_failed(), "task complete");
                return Ok(status);
            }

            debug!(task_id = %status.id, progress = ?status.progress, "task not complete yet");
            sleep(TASK_POLL_INTERVAL).await;
        }
    }

    /// Like [`wait_for_task`](Self::wait_for_task), but retries the whole
    /// wait on transient failures (poll timeouts, connection drops, 5xx)
    /// up to `attempts` times before giving up.
    pub async fn wait_for_task_with_retries(
        &self,
        task: &TaskReference,
        timeout: Duration,
        attempts: u32,
    ) -> Result<Task, Error> {
        let mut remaining = attempts.max(1);
        loop {
            remaining -= 1;
            match self.wait_for_task(task, timeout).await {
                Ok(status) => return Ok(status),
                Err(e) if e.is_transient() && remaining > 0 => {
                    warn!(task_id = %task.task_id, error = %e, remaining, "task wait failed, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Wait for a task and require a successful outcome.
    ///
    /// A terminal task with `isError: true` becomes [`Error::TaskFailed`]
    /// carrying the controller's failure reason.
    pub async fn wait_for_task_success(
        &self,
        task: &TaskReference,
        timeout: Duration,
    ) -> Result<Task, Error> {
        let status = self.wait_for_task(task, timeout).await?;
        if status.is_failed() {
            return Err(Error::TaskFailed {
                task_id: status.id.clone(),
                reason: status.failure_reason_or_default(),
            });
        }
        Ok(status)
    }

    /// Wait for a task that is expected to fail (negative tests against
    /// the controller). A successful task is a verification error.
    pub async fn wait_for_task_failure(
        &self,
        task: &TaskReference,
        timeout: Duration,
    ) -> Result<Task, Error> {
        let status = self.wait_for_task(task, timeout).await?;
        if !status.is_failed() {
            return Err(Error::Verification {
                message: format!("task {} succeeded but failure was expected", status.id),
            });
        }
        Ok(status)
    }

    /// Wait on a batch of tasks, continuing through the whole list and
    /// aggregating failures into a single error.
    pub async fn wait_for_tasks(
        &self,
        tasks: &[TaskReference],
        timeout: Duration,
    ) -> Result<Vec<Task>, Error> {
        let mut completed = Vec::with_capacity(tasks.len());
        let mut failures = Vec::new();

        for task in tasks {
            match self.wait_for_task(task, timeout).await {
                Ok(status) => {
                    if status.is_failed() {
                        failures.push(format!(
                            "task {}: {}",
                            status.id,
                            status.failure_reason_or_default()
                        ));
                    }
                    completed.push(status);
                }
                Err(e) => failures.push(format!("task {}: {e}", task.task_id)),
            }
        }

        if failures.is_empty() {
            Ok(completed)
        } else {
            Err(Error::Verification {
                message: format!("{} of {} tasks failed: {}", failures.len(), tasks.len(), failures.join("; ")),
            })
        }
    }

    /// Wait until customer-facing-service provisioning has finished for a
    /// task, by polling the task tree for a `processcfs_complete=true`
    /// marker in the semicolon-separated `data` field. The controller
    /// rejects overlapping CFS launches, so callers serialize on this.
    pub async fn wait_for_cfs_complete(&self, task: &TaskReference) -> Result<(), Error> {
        for _ in 0..CFS_MAX_CHECKS {
            let tree = self.get_task_tree(&task.task_id).await?;
            for node in &tree {
                if node.is_failed() {
                    return Err(Error::TaskFailed {
                        task_id: node.id.clone(),
                        reason: node.failure_reason_or_default(),
                    });
                }
                if let Some(data) = node.data.as_deref() {
                    if data.split(';').any(|part| part == "processcfs_complete=true") {
                        debug!(task_id = %task.task_id, "CFS provisioning complete");
                        return Ok(());
                    }
                }
            }
            debug!(task_id = %task.task_id, "CFS not complete yet, rechecking");
            sleep(CFS_POLL_INTERVAL).await;
        }

        Err(Error::TaskTimeout {
            task_id: task.task_id.clone(),
            timeout_secs: (CFS_POLL_INTERVAL.as_secs()) * u64::from(CFS_MAX_CHECKS),
        })
    }
}
