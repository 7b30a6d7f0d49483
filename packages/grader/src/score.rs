//! Raw scoring round-trip against the external service.
//!
//! One `complete` call is one request; retry policy lives a layer up in
//! [`LlmGrader`](crate::LlmGrader) so the throttling behavior can be
//! exercised against a stubbed client.

use std::future::Future;
use std::pin::Pin;

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use tracing::{debug, warn};

use crate::config::GraderConfig;

/// Errors of a single scoring round-trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    /// The service signaled throttling; the caller may retry.
    #[error("scoring service is rate limited")]
    RateLimited,

    /// The service answered with no content.
    #[error("scoring service returned an empty reply")]
    EmptyReply,

    /// Any other request failure.
    #[error("{0}")]
    Api(String),
}

/// Future type for async scoring calls.
pub type ScoreFuture = Pin<Box<dyn Future<Output = Result<String, ScoreError>> + Send>>;

/// One free-form completion round-trip against the scoring service.
pub trait ScoreClient: Send + Sync + 'static {
    /// Send the prompt and return the raw reply text.
    fn complete(&self, prompt: &str) -> ScoreFuture;
}

/// `ScoreClient` backed by an OpenAI-compatible chat completions API.
pub struct OpenAiScoreClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiScoreClient {
    /// Create a client for the configured endpoint and model.
    pub fn new(config: &GraderConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.api_key)
            .with_api_base(&config.api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
        }
    }
}

impl ScoreClient for OpenAiScoreClient {
    fn complete(&self, prompt: &str) -> ScoreFuture {
        let client = self.client.clone();
        let model = self.model.clone();
        let prompt = prompt.to_string();

        Box::pin(async move {
            debug!(model = %model, prompt_len = prompt.len(), "calling scoring API");

            let user_msg = ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.as_str())
                .build()
                .map_err(api_error)?;

            let request = CreateChatCompletionRequestArgs::default()
                .model(&model)
                .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
                .temperature(0.3)
                .max_tokens(1024u32)
                .build()
                .map_err(api_error)?;

            let response = client.chat().create(request).await.map_err(|e| {
                warn!("scoring API call failed: {}", e);
                if is_rate_limit(&e) {
                    ScoreError::RateLimited
                } else {
                    api_error(e)
                }
            })?;

            let content = response
                .choices
                .first()
                .and_then(|choice| choice.message.content.clone())
                .ok_or(ScoreError::EmptyReply)?;

            debug!("scoring API call succeeded");

            Ok(content.trim().to_string())
        })
    }
}

fn api_error(err: OpenAIError) -> ScoreError {
    ScoreError::Api(err.to_string())
}

/// Decide whether an API error is a throttling signal.
///
/// OpenAI-compatible services report 429s either with the
/// `rate_limit_exceeded` error type or with the status code embedded in
/// the message, depending on the vendor.
fn is_rate_limit(err: &OpenAIError) -> bool {
    match err {
        OpenAIError::ApiError(api) => {
            api.r#type.as_deref() == Some("rate_limit_exceeded")
                || api.message.contains("429")
                || api.message.to_ascii_lowercase().contains("rate limit")
        }
        _ => false,
    }
}
