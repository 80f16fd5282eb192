//! AI Integration Layer
//!
//! LLM client abstraction, prompt construction, and call timeouts.

pub mod prompt;
pub mod provider;
pub mod timeout;

pub use prompt::{PromptBuilder, PromptSection};
pub use provider::{LlmClient, OllamaClient, OpenAiClient, SharedLlmClient, create_llm_client};
pub use timeout::with_timeout;
