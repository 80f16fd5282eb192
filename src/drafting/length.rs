//! Length enforcement against historical bounds.

use std::time::Duration;

use tracing::debug;

use super::prompts::{REWRITE_SYSTEM_PROMPT, rewrite_prompt};
use crate::ai::{LlmClient, with_timeout};
use crate::profile::LengthTarget;
use crate::types::Result;

/// Per-call LLM settings shared by every drafting call.
///
/// `timeout` bounds the whole `generate_chat` call, including any retries
/// and backoff sleeps the client performs internally. A provider that is
/// still retrying when the budget runs out surfaces as
/// [`DraftError::Timeout`](crate::types::DraftError::Timeout), not as its
/// last [`LlmError`](crate::types::LlmError).
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChatSettings {
    pub temperature: f32,
    pub timeout: Duration,
}

impl ChatSettings {
    pub(crate) async fn chat(
        &self,
        llm: &dyn LlmClient,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        operation: &str,
    ) -> Result<String> {
        with_timeout(
            self.timeout,
            llm.generate_chat(system_prompt, user_prompt, max_tokens, self.temperature),
            operation,
        )
        .await
    }
}

/// Keep `text` inside `target`'s character bounds.
///
/// Without both bounds, or already within them, the trimmed input comes
/// back untouched. Otherwise one rewrite call is made and its output is
/// accepted as-is; the rewritten length is not checked again.
pub(crate) async fn enforce_length(
    llm: &dyn LlmClient,
    settings: &ChatSettings,
    text: &str,
    target: &LengthTarget,
    max_tokens: u32,
) -> Result<String> {
    let trimmed = text.trim();
    let Some((min_chars, max_chars)) = target.bounds() else {
        return Ok(trimmed.to_string());
    };

    let length = trimmed.chars().count();
    if (min_chars..=max_chars).contains(&length) {
        return Ok(trimmed.to_string());
    }

    debug!(length, min_chars, max_chars, "Draft outside length bounds, rewriting");
    let rewritten = settings
        .chat(
            llm,
            REWRITE_SYSTEM_PROMPT,
            &rewrite_prompt(trimmed, min_chars, max_chars),
            max_tokens,
            "length rewrite",
        )
        .await?;
    Ok(rewritten.trim().to_string())
}
