//! Message types for actor communication.

use grading_core::{
    DispatcherStats, EssaySubmission, GradeResult, Job, JobEvent, JobId, JobSnapshot,
};
use ractor::RpcReplyPort;

/// Messages for the DispatcherActor.
#[derive(Debug)]
pub enum DispatcherMessage {
    /// Enqueue a new grading job. Never fails; replies with the created
    /// job record.
    Submit {
        submission: EssaySubmission,
        reply: RpcReplyPort<Job>,
    },

    /// Look up a job by ID. Unknown ids reply `None`.
    GetJob {
        job_id: JobId,
        reply: RpcReplyPort<Option<JobSnapshot>>,
    },

    /// Report from a grading task that finished with a grade.
    JobCompleted { job_id: JobId, result: GradeResult },

    /// Report from a grading task that failed.
    JobFailed { job_id: JobId, error: String },

    /// Get dispatcher stats.
    GetStats { reply: RpcReplyPort<DispatcherStats> },

    /// Subscribe to events.
    Subscribe {
        sender: tokio::sync::broadcast::Sender<JobEvent>,
    },

    /// Periodic tick that re-attempts dispatch in case a trigger was
    /// missed.
    Tick,

    /// Shutdown the dispatcher gracefully.
    Shutdown,
}

/// Error type for reaching the dispatcher from outside the actor system.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("grading dispatcher is not running")]
    NotRunning,

    #[error("dispatcher mailbox unavailable: {0}")]
    Mailbox(String),

    #[error("dispatcher dropped the reply")]
    NoReply,
}
