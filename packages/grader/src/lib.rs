//! LLM-backed essay grader.
//!
//! This crate wraps the one external scoring call of the grading service:
//! it builds the instruction prompt, sends it to an OpenAI-compatible chat
//! endpoint, decodes the loosely-structured reply into a fixed schema and
//! retries when the service throttles.
//!
//! Layering:
//! - [`ScoreClient`] is one raw round-trip (stubbed in tests)
//! - [`LlmGrader`] owns the retry policy and reply validation and
//!   implements [`grading_core::Grader`] for the dispatcher

mod config;
mod parse;
mod prompt;
mod score;

pub use config::GraderConfig;
pub use parse::parse_grade_reply;
pub use prompt::build_grading_prompt;
pub use score::{OpenAiScoreClient, ScoreClient, ScoreError, ScoreFuture};

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use grading_core::{EssaySubmission, GradeError, GradeFuture, Grader};

/// Grader that scores essays through a [`ScoreClient`].
///
/// Reentrant: each call clones the client handle and keeps no state of
/// its own, so any number of grading calls may be in flight at once.
pub struct LlmGrader {
    client: Arc<dyn ScoreClient>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl LlmGrader {
    /// Create a grader talking to the configured OpenAI-compatible API.
    pub fn new(config: GraderConfig) -> Self {
        let client = Arc::new(OpenAiScoreClient::new(&config));
        Self::with_client(client, &config)
    }

    /// Create a grader over an explicit client. Used to stub the external
    /// service.
    pub fn with_client(client: Arc<dyn ScoreClient>, config: &GraderConfig) -> Self {
        Self {
            client,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay,
        }
    }
}

impl Grader for LlmGrader {
    fn grade(&self, submission: &EssaySubmission) -> GradeFuture {
        let client = self.client.clone();
        let prompt = build_grading_prompt(submission);
        let max_attempts = self.max_attempts;
        let retry_delay = self.retry_delay;

        Box::pin(async move {
            let mut attempt = 0;
            loop {
                attempt += 1;
                match client.complete(&prompt).await {
                    Ok(reply) => return parse_grade_reply(&reply),
                    Err(ScoreError::RateLimited) if attempt < max_attempts => {
                        warn!(
                            attempt,
                            max_attempts, "scoring service throttled, backing off"
                        );
                        tokio::time::sleep(retry_delay).await;
                    }
                    Err(ScoreError::RateLimited) => {
                        return Err(GradeError::RateLimited { attempts: attempt });
                    }
                    Err(ScoreError::EmptyReply) => return Err(GradeError::EmptyReply),
                    Err(ScoreError::Api(message)) => return Err(GradeError::Transport(message)),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    const VALID_REPLY: &str = r#"{
        "score": 9,
        "feedback": "Strong essay.",
        "checkpoints": {
            "grammar": 9, "coherence": 9, "topicRelevance": 9,
            "creativity": 8, "structure": 9
        }
    }"#;

    /// Client that throttles a fixed number of calls before answering.
    struct ThrottledClient {
        calls: AtomicU32,
        throttled_calls: u32,
        reply: &'static str,
    }

    impl ThrottledClient {
        fn new(throttled_calls: u32, reply: &'static str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                throttled_calls,
                reply,
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ScoreClient for ThrottledClient {
        fn complete(&self, _prompt: &str) -> ScoreFuture {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let throttled = call < self.throttled_calls;
            let reply = self.reply;
            Box::pin(async move {
                if throttled {
                    Err(ScoreError::RateLimited)
                } else {
                    Ok(reply.to_string())
                }
            })
        }
    }

    fn fast_retry_config() -> GraderConfig {
        GraderConfig::default().with_retry(3, Duration::from_millis(1))
    }

    fn submission() -> EssaySubmission {
        EssaySubmission {
            essay: "essay".to_string(),
            topic: "topic".to_string(),
            char_count: 1200,
        }
    }

    #[tokio::test]
    async fn recovers_after_two_throttled_calls() {
        let _ = tracing_subscriber::fmt::try_init();

        let client = Arc::new(ThrottledClient::new(2, VALID_REPLY));
        let grader = LlmGrader::with_client(client.clone(), &fast_retry_config());

        let grade = grader.grade(&submission()).await.unwrap();
        assert_eq!(grade.score, 9);
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn persistent_throttling_exhausts_the_retry_budget() {
        let client = Arc::new(ThrottledClient::new(u32::MAX, VALID_REPLY));
        let grader = LlmGrader::with_client(client.clone(), &fast_retry_config());

        let err = grader.grade(&submission()).await.unwrap_err();
        assert_eq!(err, GradeError::RateLimited { attempts: 3 });
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn transport_failures_are_not_retried() {
        struct BrokenClient(AtomicU32);
        impl ScoreClient for BrokenClient {
            fn complete(&self, _prompt: &str) -> ScoreFuture {
                self.0.fetch_add(1, Ordering::SeqCst);
                Box::pin(async { Err(ScoreError::Api("503 upstream unavailable".to_string())) })
            }
        }

        let client = Arc::new(BrokenClient(AtomicU32::new(0)));
        let grader = LlmGrader::with_client(client.clone(), &fast_retry_config());

        let err = grader.grade(&submission()).await.unwrap_err();
        assert!(matches!(err, GradeError::Transport(ref m) if m.contains("503")));
        assert_eq!(client.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn undecodable_replies_are_not_retried() {
        let client = Arc::new(ThrottledClient::new(0, "no structured block here"));
        let grader = LlmGrader::with_client(client.clone(), &fast_retry_config());

        let err = grader.grade(&submission()).await.unwrap_err();
        assert_eq!(err, GradeError::Parse);
        assert_eq!(client.calls(), 1);
    }
}
