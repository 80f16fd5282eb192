//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{drafting, network};
use crate::types::{DraftError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Section drafting settings
    pub drafting: DraftingConfig,

    /// Metadata store settings
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            drafting: DraftingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(DraftError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(DraftError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.drafting.content_top_k == 0 || self.drafting.style_top_k == 0 {
            return Err(DraftError::Config(
                "Drafting top_k values must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("grounded_max_tokens", self.drafting.grounded_max_tokens),
            ("template_max_tokens", self.drafting.template_max_tokens),
            ("rewrite_max_tokens", self.drafting.rewrite_max_tokens),
        ] {
            if value == 0 {
                return Err(DraftError::Config(format!(
                    "Drafting {} must be greater than 0",
                    name
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// API keys are never serialized and are redacted in debug output.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider type: "openai", "ollama"
    pub provider: String,

    /// Model name (empty = provider default)
    pub model: String,

    /// Custom endpoint
    pub api_base: Option<String>,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Per-request HTTP timeout, and the budget for one whole generation
    /// call including client retries
    pub timeout_secs: u64,

    /// Temperature for LLM generation (0.0 = deterministic)
    pub temperature: f32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: String::new(),
            api_base: None,
            api_key: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
        }
    }
}

// =============================================================================
// Drafting Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftingConfig {
    pub content_top_k: usize,
    pub style_top_k: usize,
    pub grounded_max_tokens: u32,
    pub template_max_tokens: u32,
    pub rewrite_max_tokens: u32,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            content_top_k: drafting::CONTENT_TOP_K,
            style_top_k: drafting::STYLE_TOP_K,
            grounded_max_tokens: drafting::GROUNDED_MAX_TOKENS,
            template_max_tokens: drafting::TEMPLATE_MAX_TOKENS,
            rewrite_max_tokens: drafting::REWRITE_MAX_TOKENS,
        }
    }
}

// =============================================================================
// Storage Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite metadata database (relative paths resolve from the working dir)
    pub database_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".reportdraft/metadata.db"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.drafting.content_top_k, 6);
        assert_eq!(config.drafting.style_top_k, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(DraftError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = Config::default();
        config.drafting.style_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = Config::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(format!("{:?}", config.llm).contains("[REDACTED]"));
    }
}
