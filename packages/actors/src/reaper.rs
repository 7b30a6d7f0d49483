//! Eviction of old terminal jobs to bound memory.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use grading_core::{Job, JobId};

/// Remove every terminal job older than `retention`.
///
/// Jobs still queued or processing are never touched, regardless of age,
/// so the pending queue stays consistent with the map.
pub(crate) fn reap(
    jobs: &mut HashMap<JobId, Job>,
    retention: Duration,
    now: DateTime<Utc>,
) -> usize {
    let before = jobs.len();
    jobs.retain(|_, job| !(job.status.is_terminal() && now - job.created_at > retention));
    before - jobs.len()
}
