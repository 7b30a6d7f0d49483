//! In-process API for the essay grading service.
//!
//! This crate is the surface the host exam application calls:
//! - submit / poll functions with wire-shaped request and response types
//! - one-time service initialization
//! - event subscription for observers
//!
//! The host owns everything outside this surface: HTTP framing, session
//! handling, and durable storage of finished grades.

mod events;
mod init;
mod jobs;

pub use events::subscribe_events;
pub use init::{init_grading_service, init_grading_service_with, shutdown_grading_service};
pub use jobs::{
    PollResponse, SubmitRequest, SubmitResponse, dispatcher_stats, poll_job, submit_essay,
};

// Re-export commonly used types for convenience
pub use actors::DispatchError;
pub use grading_core::{
    Checkpoints, DispatcherConfig, DispatcherStats, GradeResult, JobEvent, JobStatus,
};
