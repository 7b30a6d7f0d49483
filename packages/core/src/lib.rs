//! Core domain types for the essay grading service.
//!
//! This crate contains shared types used across all packages:
//! - Job and JobStatus for grading work items
//! - GradeResult and Checkpoints for scoring outcomes
//! - The Grader trait that the dispatcher executes jobs through
//! - Events for real-time updates

mod dispatcher;
mod events;
mod grade;
mod grader;
mod job;

pub use dispatcher::{DispatcherConfig, DispatcherStats};
pub use events::JobEvent;
pub use grade::{Checkpoints, GradeResult, MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE, clamp_score};
pub use grader::{FnGrader, GradeError, GradeFuture, Grader};
pub use job::{EssaySubmission, Job, JobId, JobSnapshot, JobStatus};
