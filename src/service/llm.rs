//! Shared LLM client and interaction utilities
//!
//! `ModelClient` is the seam the profile and collateral services call through;
//! `LlmClient` implements it on top of the OpenAI provider.

use std::time::Duration;

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;
use thiserror::Error;

/// System preamble for every generation call
pub const SYSTEM_PREAMBLE: &str = "You are a B2B sales research assistant. Always return valid JSON.";

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u64 = 2000;

/// Error type for model calls
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    #[error("model transport failed: {0}")]
    Transport(String),

    #[error("model rate limited: {0}")]
    RateLimited(String),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("model provider error: {0}")]
    Provider(String),

    #[error("model rejected the request: {0}")]
    Rejected(String),

    #[error("model client is not configured: {0}")]
    NotConfigured(String),

    #[error("deadline exceeded before the model could be called")]
    DeadlineExceeded,
}

impl ModelError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ModelError::Transport(_)
                | ModelError::RateLimited(_)
                | ModelError::Timeout(_)
                | ModelError::Provider(_)
        )
    }

    /// Classify a provider error message
    fn classify(message: String) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota") {
            ModelError::RateLimited(message)
        } else if lower.contains("401")
            || lower.contains("403")
            || lower.contains("invalid_api_key")
            || lower.contains("invalid api key")
            || lower.contains("400 bad request")
        {
            ModelError::Rejected(message)
        } else if lower.contains("http") || lower.contains("connect") || lower.contains("timed out")
        {
            ModelError::Transport(message)
        } else {
            ModelError::Provider(message)
        }
    }
}

/// Text-in, text-out generative model
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
    model: String,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str, model: impl Into<String>) -> Result<Self, ModelError> {
        if api_key.trim().is_empty() {
            return Err(ModelError::NotConfigured("OPENAI_API_KEY is empty".to_string()));
        }
        let client = openai::Client::new(api_key).map_err(|e| {
            ModelError::NotConfigured(format!("Failed to create OpenAI client: {}", e))
        })?;

        Ok(Self {
            client,
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PREAMBLE)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .build();

        let start_time = std::time::Instant::now();
        tracing::debug!(
            model = %self.model,
            prompt_length = prompt.len(),
            "Initiating OpenAI API call"
        );

        match agent.prompt(prompt).await {
            Ok(response) => {
                tracing::info!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt.len(),
                    response_length = response.len(),
                    "OpenAI API call completed successfully"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model,
                    elapsed_ms = start_time.elapsed().as_millis(),
                    prompt_length = prompt.len(),
                    error = %e,
                    "OpenAI API call failed"
                );
                Err(ModelError::classify(e.to_string()))
            }
        }
    }
}
