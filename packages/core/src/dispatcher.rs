//! Configuration and statistics for the dispatcher.

use serde::{Deserialize, Serialize};

/// Configuration for dispatcher behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Maximum number of scoring calls allowed in flight at once.
    pub concurrency: u32,
    /// Interval of the safety tick that re-attempts dispatch (seconds).
    pub tick_interval_secs: u64,
    /// Hard ceiling on a single grading task (seconds). A scoring call
    /// that exceeds it fails the job and frees its slot.
    pub grade_timeout_secs: u64,
    /// Store size above which a submission also triggers the reaper.
    pub reap_threshold: usize,
    /// Minimum age of a terminal job before the reaper may evict it
    /// (seconds).
    pub retention_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            tick_interval_secs: 1,
            grade_timeout_secs: 300, // 5 minutes
            reap_threshold: 1000,
            retention_secs: 3600, // 1 hour
        }
    }
}

impl DispatcherConfig {
    /// Set the concurrency cap.
    pub fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the grading timeout.
    pub fn with_grade_timeout_secs(mut self, secs: u64) -> Self {
        self.grade_timeout_secs = secs;
        self
    }

    /// Set the reaper threshold and retention window.
    pub fn with_reaping(mut self, threshold: usize, retention_secs: u64) -> Self {
        self.reap_threshold = threshold;
        self.retention_secs = retention_secs;
        self
    }
}

/// Statistics for the dispatcher's current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherStats {
    /// Number of jobs waiting in the pending queue.
    pub queued: u64,
    /// Number of jobs with a scoring call in flight.
    pub processing: u64,
    /// Number of jobs completed since the dispatcher started.
    pub completed: u64,
    /// Number of jobs failed since the dispatcher started.
    pub failed: u64,
}

impl DispatcherStats {
    /// Jobs not yet in a terminal state.
    pub fn active(&self) -> u64 {
        self.queued + self.processing
    }

    /// Jobs that reached a terminal state.
    pub fn processed(&self) -> u64 {
        self.completed + self.failed
    }

    /// Success rate as a percentage, if anything finished yet.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.processed();
        if total == 0 {
            None
        } else {
            Some((self.completed as f64 / total as f64) * 100.0)
        }
    }
}
