//! Data types for the publish flow.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Aggregated outcome of one publish run — the only thing the caller sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub success: bool,
    pub message: String,
    /// Paths that exhausted their retry budget (or were never attempted
    /// because the run was cancelled). Empty on success.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub failed_paths: BTreeSet<String>,
}

impl PublishResult {
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            failed_paths: BTreeSet::new(),
        }
    }

    pub fn failed(message: impl Into<String>, failed_paths: BTreeSet<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            failed_paths,
        }
    }
}

/// Progress event emitted during a publish run.
#[derive(Debug, Clone)]
pub enum PublishEvent {
    /// Progress update, `progress` in `0.0..=1.0`.
    Progress { progress: f64, status: String },
    /// Run finished with every upload succeeding.
    Completed,
    /// Run finished with a fatal error or failed paths.
    Failed { error: String },
}

/// One pending upload. `attempt` counts issued tries: a task created fresh
/// is attempt 0 and may be retried exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub relative_path: String,
    pub attempt: u8,
}

impl UploadTask {
    pub fn new(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            attempt: 0,
        }
    }

    /// Consumes the task and returns the retry task, or `None` when the
    /// retry budget (one retry, two attempts total) is spent.
    pub fn retry(self) -> Option<Self> {
        if self.attempt == 0 {
            Some(Self {
                relative_path: self.relative_path,
                attempt: 1,
            })
        } else {
            None
        }
    }
}
