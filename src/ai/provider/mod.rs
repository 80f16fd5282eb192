//! LLM Client Abstraction
//!
//! Defines the `LlmClient` trait: a stateless chat completion that returns
//! plain text. Drafting code only depends on this trait.
//!
//! ## Modules
//!
//! - `openai`: OpenAI-compatible Chat Completions
//! - `ollama`: Local Ollama `/api/chat`

mod ollama;
mod openai;

pub use ollama::OllamaClient;
pub use openai::OpenAiClient;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::types::{LlmError, Result};

/// Shared LLM client for the drafting pipeline
pub type SharedLlmClient = Arc<dyn LlmClient>;

/// Stateless text-completion capability
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one chat completion and return the assistant text
    async fn generate_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;
}

/// Create a shared client from configuration
pub fn create_llm_client(config: &LlmConfig) -> Result<SharedLlmClient> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(config)?)),
        "ollama" => Ok(Arc::new(OllamaClient::new(config)?)),
        _ => Err(crate::types::DraftError::Config(format!(
            "Unknown provider: {}. Supported: openai, ollama",
            config.provider
        ))),
    }
}

/// Retry predicate shared by the HTTP clients
pub(crate) fn is_retryable(err: &crate::types::DraftError) -> bool {
    match err {
        crate::types::DraftError::Llm(LlmError { category, .. }) => category.is_retryable(),
        _ => false,
    }
}

/// Backoff delay for the next attempt, stretched to the provider's
/// `retry_after` hint when that is longer. `None` stops retrying.
pub(crate) fn retry_delay(
    err: &crate::types::DraftError,
    backoff: Option<Duration>,
) -> Option<Duration> {
    let delay = backoff?;
    match err {
        crate::types::DraftError::Llm(LlmError {
            retry_after: Some(hint),
            ..
        }) => Some(delay.max(*hint)),
        _ => Some(delay),
    }
}
