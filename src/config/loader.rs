//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/reportdraft/config.toml)
//! 3. Project config (.reportdraft/config.toml)
//! 4. Environment variables (REPORTDRAFT_* prefix, `__` between levels)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DraftError, Result};

const ENV_PREFIX: &str = "REPORTDRAFT_";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let project = Self::project_config_path();
        Self::load_layers(Self::global_config_path().as_deref(), Some(&project))
    }

    /// Load configuration from a specific file only (plus env overrides)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Self::load_layers(None, Some(path))
    }

    fn load_layers(global: Option<&Path>, project: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = project
            && project_path.exists()
        {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(project_path));
        }

        // REPORTDRAFT_DRAFTING__CONTENT_TOP_K -> drafting.content_top_k
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DraftError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (~/.config/reportdraft/ on Linux)
    pub fn global_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "reportdraft").map(|d| d.config_dir().to_path_buf())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".reportdraft")
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| DraftError::Config(e.to_string()))
        }
    }

    /// Write a default config file into `dir`. Existing files are kept
    /// unless `force` is set.
    pub fn init_at(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }
        Ok(config_path)
    }

    /// Initialize the project config under `.reportdraft/`
    pub fn init_project(force: bool) -> Result<PathBuf> {
        Self::init_at(&Self::project_dir(), force)
    }

    /// Initialize the global config
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let dir = Self::global_dir().ok_or_else(|| {
            DraftError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::init_at(&dir, force)
    }

    fn default_config() -> String {
        r#"# reportdraft configuration
# Project settings in .reportdraft/config.toml override global ones.

version = "1.0"

[llm]
provider = "openai"
model = ""
timeout_secs = 120
temperature = 0.2

[drafting]
content_top_k = 6
style_top_k = 4
grounded_max_tokens = 1200
template_max_tokens = 500
rewrite_max_tokens = 1200

[storage]
database_path = ".reportdraft/metadata.db"
"#
        .to_string()
    }
}
