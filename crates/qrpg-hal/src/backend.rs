//! Backend trait.
//!
//! The [`Backend`] trait defines the lifecycle for running a circuit:
//!
//! ```text
//!   capabilities() ──→ submit() ──→ status() ──→ result()
//!    (sync, &ref)      (async)      (async)      (async)
//! ```
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `capabilities()` | sync | yes | `&Capabilities` |
//! | `submit()` | async | yes | `HalResult<JobId>` |
//! | `status()` | async | yes | `HalResult<JobStatus>` |
//! | `result()` | async | yes | `HalResult<ExecutionResult>` |
//! | `wait()` | async | provided | `HalResult<ExecutionResult>` |
//! | `wait_with()` | async | provided | `HalResult<ExecutionResult>` |

use async_trait::async_trait;
use qrpg_ir::Circuit;
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::observer::{JobObserver, NoopObserver, WaitOptions};
use crate::result::ExecutionResult;

/// Trait for quantum backends.
///
/// - `capabilities()` is synchronous and infallible; implementations cache
///   capabilities at construction time.
/// - `submit()` returns a job that starts out `Queued`.
/// - `result()` is only valid once `status()` reports `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Submit a circuit for execution.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Wait for a job with default [`WaitOptions`] and no observer.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_with(job_id, &NoopObserver, WaitOptions::default())
            .await
    }

    /// Poll until the job reaches a terminal state.
    ///
    /// The observer sees each distinct status once, in the order observed.
    /// Failure and cancellation become errors; completion fetches the result.
    async fn wait_with(
        &self,
        job_id: &JobId,
        observer: &dyn JobObserver,
        options: WaitOptions,
    ) -> HalResult<ExecutionResult> {
        let started = tokio::time::Instant::now();
        let mut last: Option<JobStatus> = None;

        loop {
            let status = self.status(job_id).await?;
            if last.as_ref() != Some(&status) {
                debug!(job_id = %job_id, status = %status, "job status changed");
                observer.on_status(job_id, &status);
                last = Some(status.clone());
            }

            match status {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {}
            }

            if let Some(timeout) = options.timeout {
                if started.elapsed() >= timeout {
                    return Err(HalError::Timeout(job_id.0.clone()));
                }
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }
}
