//! Submit and poll functions for the host application.

use actors::{DispatchError, DispatcherMessage, global_registry};
use grading_core::{DispatcherStats, EssaySubmission, GradeResult, JobId, JobSnapshot, JobStatus};
use serde::{Deserialize, Serialize};

/// Request type for submitting an essay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub essay: String,
    pub topic: String,
    pub char_count: usize,
}

/// Response type for a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Poll result in the wire shape the exam frontend consumes.
///
/// `result` is present only on completed jobs, `error` only on failed
/// ones; `position` is the 1-based queue rank while queued and `0` while
/// processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GradeResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl From<JobSnapshot> for PollResponse {
    fn from(snapshot: JobSnapshot) -> Self {
        let status = snapshot.job.status.as_str().to_string();
        match snapshot.job.status {
            JobStatus::Queued => Self {
                status,
                result: None,
                error: None,
                position: Some(snapshot.position),
            },
            JobStatus::Processing { .. } => Self {
                status,
                result: None,
                error: None,
                position: Some(0),
            },
            JobStatus::Completed { result, .. } => Self {
                status,
                result: Some(result),
                error: None,
                position: None,
            },
            JobStatus::Failed { error, .. } => Self {
                status,
                result: None,
                error: Some(error),
                position: None,
            },
        }
    }
}

/// Enqueue a grading job. Returns immediately with the new job's id.
pub async fn submit_essay(request: SubmitRequest) -> Result<SubmitResponse, DispatchError> {
    let dispatcher = global_registry().get().ok_or(DispatchError::NotRunning)?;

    let submission = EssaySubmission {
        essay: request.essay,
        topic: request.topic,
        char_count: request.char_count,
    };

    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::Submit {
            submission,
            reply: tx.into(),
        })
        .map_err(|e| DispatchError::Mailbox(e.to_string()))?;

    let job = rx.await.map_err(|_| DispatchError::NoReply)?;

    Ok(SubmitResponse {
        job_id: job.id.to_string(),
    })
}

/// Poll a job by id.
///
/// An id that is unknown, already reaped, or not even a well-formed job
/// id reads as `None`; absence is not an error.
pub async fn poll_job(id: &str) -> Result<Option<PollResponse>, DispatchError> {
    let Ok(job_id) = JobId::parse(id) else {
        return Ok(None);
    };

    let dispatcher = global_registry().get().ok_or(DispatchError::NotRunning)?;

    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::GetJob {
            job_id,
            reply: tx.into(),
        })
        .map_err(|e| DispatchError::Mailbox(e.to_string()))?;

    let snapshot = rx.await.map_err(|_| DispatchError::NoReply)?;

    Ok(snapshot.map(PollResponse::from))
}

/// Current dispatcher counters.
pub async fn dispatcher_stats() -> Result<DispatcherStats, DispatchError> {
    let dispatcher = global_registry().get().ok_or(DispatchError::NotRunning)?;

    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::GetStats { reply: tx.into() })
        .map_err(|e| DispatchError::Mailbox(e.to_string()))?;

    rx.await.map_err(|_| DispatchError::NoReply)
}
