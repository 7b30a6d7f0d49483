//! Job domain types for grading work items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::GradeResult;

/// Unique identifier for a job, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Ulid);

impl JobId {
    /// Create a new unique job ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a job ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The essay a caller handed in for grading. Immutable once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssaySubmission {
    /// Full essay text.
    pub essay: String,
    /// Topic the essay was written against.
    pub topic: String,
    /// Character count captured at submission time.
    pub char_count: usize,
}

/// Current status of a job in its lifecycle.
///
/// Transitions only move forward: `Queued -> Processing -> Completed` or
/// `Queued -> Processing -> Failed`. The grade and the failure message live
/// inside the terminal variants, so a result can only exist on a completed
/// job and an error only on a failed one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting in the pending queue.
    #[default]
    Queued,
    /// Job's scoring call is in flight.
    Processing { started_at: DateTime<Utc> },
    /// Job finished with a grade.
    Completed {
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        result: GradeResult,
    },
    /// Job failed; no automatic retry, a new submission is required.
    Failed {
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
        error: String,
    },
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }

    /// Check if the job is still waiting in the queue.
    pub fn is_queued(&self) -> bool {
        matches!(self, JobStatus::Queued)
    }

    /// Get a simple status string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing { .. } => "processing",
            JobStatus::Completed { .. } => "completed",
            JobStatus::Failed { .. } => "failed",
        }
    }
}

/// A job tracks one essay submission from enqueue to a terminal outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier for this job.
    pub id: JobId,
    /// The essay payload, frozen at submission time.
    pub submission: EssaySubmission,
    /// Current status.
    pub status: JobStatus,
    /// When the job was created. Drives the reaper's age check.
    pub created_at: DateTime<Utc>,
    /// When the job was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job.
    pub fn new(submission: EssaySubmission) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            submission,
            status: JobStatus::Queued,
            created_at: now,
            updated_at: now,
        }
    }

    /// The grade, if the job completed.
    pub fn result(&self) -> Option<&GradeResult> {
        match &self.status {
            JobStatus::Completed { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The failure message, if the job failed.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Failed { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }
}

/// Point-in-time view of a job returned to pollers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Copy of the job record at read time.
    pub job: Job,
    /// 1-based rank in the pending queue while queued, 0 otherwise.
    /// Recomputed on every read; it may change between two polls.
    pub position: usize,
}
