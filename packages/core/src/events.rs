//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DispatcherStats, Job, JobId};

/// Events emitted by the dispatcher for observers.
///
/// Delivery is lossy broadcast; pollers never depend on these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JobEvent {
    /// A new job entered the pending queue.
    JobQueued { job: Job, timestamp: DateTime<Utc> },
    /// A job's scoring call started.
    JobStarted {
        job_id: JobId,
        timestamp: DateTime<Utc>,
    },
    /// A job completed with a grade.
    JobCompleted {
        job_id: JobId,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    /// A job failed.
    JobFailed {
        job_id: JobId,
        error: String,
        timestamp: DateTime<Utc>,
    },
    /// The reaper evicted old terminal jobs.
    JobsReaped {
        removed: usize,
        timestamp: DateTime<Utc>,
    },
    /// The dispatcher's counters changed.
    StatsUpdated {
        stats: DispatcherStats,
        timestamp: DateTime<Utc>,
    },
}

impl JobEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            JobEvent::JobQueued { timestamp, .. } => *timestamp,
            JobEvent::JobStarted { timestamp, .. } => *timestamp,
            JobEvent::JobCompleted { timestamp, .. } => *timestamp,
            JobEvent::JobFailed { timestamp, .. } => *timestamp,
            JobEvent::JobsReaped { timestamp, .. } => *timestamp,
            JobEvent::StatsUpdated { timestamp, .. } => *timestamp,
        }
    }

    /// Get the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            JobEvent::JobQueued { job, .. } => Some(job.id),
            JobEvent::JobStarted { job_id, .. } => Some(*job_id),
            JobEvent::JobCompleted { job_id, .. } => Some(*job_id),
            JobEvent::JobFailed { job_id, .. } => Some(*job_id),
            JobEvent::JobsReaped { .. } | JobEvent::StatsUpdated { .. } => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            JobEvent::JobQueued { job, .. } => format!("Job {} queued", job.id),
            JobEvent::JobStarted { job_id, .. } => format!("Job {} started", job_id),
            JobEvent::JobCompleted {
                job_id,
                duration_ms,
                ..
            } => format!("Job {} completed in {}ms", job_id, duration_ms),
            JobEvent::JobFailed { job_id, error, .. } => {
                format!("Job {} failed: {}", job_id, error)
            }
            JobEvent::JobsReaped { removed, .. } => {
                format!("Reaped {} old terminal jobs", removed)
            }
            JobEvent::StatsUpdated { stats, .. } => {
                format!(
                    "Stats: {} queued, {} processing",
                    stats.queued, stats.processing
                )
            }
        }
    }
}
