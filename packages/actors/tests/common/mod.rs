#![allow(clippy::disallowed_methods)]

use std::sync::Arc;
use std::time::Duration;

use actors::{ActorRef, DispatcherMessage};
use grading_core::{
    Checkpoints, DispatcherStats, EssaySubmission, FnGrader, GradeError, GradeFuture, GradeResult,
    Grader, Job, JobId, JobSnapshot,
};
use tokio::sync::{mpsc, oneshot};

/// A grading call parked until the test decides its outcome.
pub struct GateCall {
    pub topic: String,
    pub release: oneshot::Sender<Result<GradeResult, GradeError>>,
}

/// Grader whose calls park until the test releases them.
pub struct GatedGrader {
    calls: mpsc::UnboundedSender<GateCall>,
}

impl Grader for GatedGrader {
    fn grade(&self, submission: &EssaySubmission) -> GradeFuture {
        let calls = self.calls.clone();
        let topic = submission.topic.clone();
        Box::pin(async move {
            let (release, outcome) = oneshot::channel();
            calls
                .send(GateCall { topic, release })
                .expect("test dropped the gate receiver");
            outcome.await.expect("test dropped the release sender")
        })
    }
}

/// Build a gated grader plus the receiving end of its call stream.
pub fn gated_grader() -> (Arc<GatedGrader>, mpsc::UnboundedReceiver<GateCall>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(GatedGrader { calls: tx }), rx)
}

/// Grader that succeeds immediately with [`sample_grade`].
pub fn instant_grader() -> Arc<dyn Grader> {
    Arc::new(FnGrader::new(|_submission: &EssaySubmission| {
        Box::pin(async { Ok(sample_grade()) })
    }))
}

pub fn sample_grade() -> GradeResult {
    GradeResult {
        score: 8,
        feedback: "Clear and well structured.".to_string(),
        checkpoints: Checkpoints {
            grammar: 8,
            coherence: 8,
            topic_relevance: 9,
            creativity: 7,
            structure: 8,
        },
    }
}

/// Numbered submission; the topic carries the index so gated graders can
/// tell calls apart.
pub fn submission(index: usize) -> EssaySubmission {
    EssaySubmission {
        essay: format!("Essay body number {index}."),
        topic: format!("topic-{index}"),
        char_count: 1200 + index,
    }
}

pub async fn submit(dispatcher: &ActorRef<DispatcherMessage>, index: usize) -> Job {
    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::Submit {
            submission: submission(index),
            reply: tx.into(),
        })
        .expect("submit send");
    rx.await.expect("submit reply")
}

pub async fn poll(dispatcher: &ActorRef<DispatcherMessage>, job_id: JobId) -> Option<JobSnapshot> {
    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::GetJob {
            job_id,
            reply: tx.into(),
        })
        .expect("poll send");
    rx.await.expect("poll reply")
}

pub async fn stats(dispatcher: &ActorRef<DispatcherMessage>) -> DispatcherStats {
    let (tx, rx) = actors::concurrency::oneshot();
    dispatcher
        .send_message(DispatcherMessage::GetStats { reply: tx.into() })
        .expect("stats send");
    rx.await.expect("stats reply")
}

/// Poll until the job satisfies `pred` or a 5 second deadline passes.
pub async fn wait_for(
    dispatcher: &ActorRef<DispatcherMessage>,
    job_id: JobId,
    pred: impl Fn(&JobSnapshot) -> bool,
) -> JobSnapshot {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(snapshot) = poll(dispatcher, job_id).await {
            if pred(&snapshot) {
                return snapshot;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting on job {job_id}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
