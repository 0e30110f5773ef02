//! Job progress reporting.
//!
//! A [`JobObserver`] receives status transitions while [`Backend::wait_with`]
//! polls, plus free-form progress messages from higher layers.
//!
//! [`Backend::wait_with`]: crate::Backend::wait_with

use std::sync::Mutex;
use std::time::Duration;

use crate::job::{JobId, JobStatus};

/// Receives progress from a running generation.
pub trait JobObserver: Send + Sync {
    /// A job entered a new status. Called once per transition.
    fn on_status(&self, job_id: &JobId, status: &JobStatus) {
        let _ = (job_id, status);
    }

    /// A human-readable progress message.
    fn on_message(&self, message: &str) {
        let _ = message;
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl JobObserver for NoopObserver {}

/// Observer that keeps every message, status transitions included.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    messages: Mutex<Vec<String>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Take the recorded messages, leaving the recorder empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    fn push(&self, message: String) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message);
    }
}

impl JobObserver for RecordingObserver {
    fn on_status(&self, job_id: &JobId, status: &JobStatus) {
        self.push(format!("Job {job_id}: {status}"));
    }

    fn on_message(&self, message: &str) {
        self.push(message.to_string());
    }
}

/// Polling parameters for [`Backend::wait_with`].
///
/// [`Backend::wait_with`]: crate::Backend::wait_with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between status polls.
    pub poll_interval: Duration,
    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WaitOptions {
    /// Default poll interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
    /// Default timeout. Remote queues can take well over a few minutes.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set or clear the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            timeout: Some(Self::DEFAULT_TIMEOUT),
        }
    }
}
