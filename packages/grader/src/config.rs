//! Grader configuration.

use std::time::Duration;

/// Configuration for the LLM-backed grader.
#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// API key for the scoring endpoint.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible chat completions endpoint.
    pub api_base: String,
    /// Model name to request.
    pub model: String,
    /// Total attempts per grading call while the service is throttling.
    pub max_attempts: u32,
    /// Fixed delay between throttled attempts.
    pub retry_delay: Duration,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash-lite".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl GraderConfig {
    /// Build a config from environment variables.
    ///
    /// - `LLM_API_KEY` (required in practice; empty default)
    /// - `LLM_API_BASE_URL` (default: Google's OpenAI-compatible endpoint)
    /// - `LLM_MODEL_NAME` (default: `gemini-2.5-flash-lite`)
    /// - `LLM_MAX_ATTEMPTS` (default: 3)
    /// - `LLM_RETRY_DELAY_MS` (default: 2000)
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_key: std::env::var("LLM_API_KEY").unwrap_or(default.api_key),
            api_base: std::env::var("LLM_API_BASE_URL").unwrap_or(default.api_base),
            model: std::env::var("LLM_MODEL_NAME").unwrap_or(default.model),
            max_attempts: std::env::var("LLM_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_attempts),
            retry_delay: std::env::var("LLM_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(default.retry_delay),
        }
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay = retry_delay;
        self
    }
}
