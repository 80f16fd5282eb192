//! OpenAI API Client
//!
//! Chat Completions against any OpenAI-compatible endpoint.
//! Transient failures are retried with exponential backoff.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::{LlmClient, is_retryable, retry_delay};
use crate::config::LlmConfig;
use crate::constants::network as net_constants;
use crate::types::{DraftError, ErrorCategory, LlmError, Result};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const PROVIDER: &str = "openai";

/// OpenAI client with secure API key handling
pub struct OpenAiClient {
    /// Never exposed in logs or debug output
    api_key: SecretString,
    api_base: String,
    model: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key_str = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                DraftError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY env var or provide in config"
                        .to_string(),
                )
            })?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let model = if config.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.model.clone()
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DraftError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: SecretString::from(api_key_str),
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            client,
        })
    }

    fn build_request(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature,
            max_tokens: Some(max_tokens),
        }
    }

    async fn send_once(&self, request: &ChatCompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(request)
            .send()
            .await
            .map_err(|e| DraftError::Llm(LlmError::from_transport(&e, PROVIDER)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Llm(LlmError::from_status(
                status.as_u16(),
                &format!("OpenAI API error ({}): {}", status, body),
                PROVIDER,
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            DraftError::llm_with_category(
                ErrorCategory::Unknown,
                format!("Failed to parse OpenAI response: {}", e),
            )
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                DraftError::llm_with_category(
                    ErrorCategory::Unknown,
                    "No content in OpenAI response",
                )
            })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = self.build_request(system_prompt, user_prompt, max_tokens, temperature);
        let start_time = Instant::now();

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(net_constants::RETRY_BASE_DELAY_MS))
            .with_max_delay(Duration::from_secs(net_constants::RETRY_MAX_DELAY_SECS))
            .with_max_times(net_constants::MAX_NETWORK_RETRIES)
            .with_jitter();

        let content = (|| self.send_once(&request))
            .retry(backoff)
            .when(is_retryable)
            .adjust(retry_delay)
            .notify(|err, delay| warn!("OpenAI request failed, retrying in {:?}: {}", delay, err))
            .await?;

        debug!(
            model = %self.model,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            chars = content.len(),
            "OpenAI completion received"
        );
        Ok(content)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig {
            provider: "openai".to_string(),
            model: "gpt-test".to_string(),
            api_key: Some("sk-test-secret".to_string()),
            api_base: Some("https://example.invalid/v1/".to_string()),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = OpenAiClient::new(&config()).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-test-secret"));
    }

    #[test]
    fn test_build_request_shape() {
        let client = OpenAiClient::new(&config()).unwrap();
        assert_eq!(client.api_base, "https://example.invalid/v1");

        let request = client.build_request("sys", "user", 300, 0.2);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-test");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "user");
        assert_eq!(json["max_tokens"], 300);
    }
}
