//! CLI Common Utilities
//!
//! Shared context and output helpers for command handlers.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::ai::create_llm_client;
use crate::analyzer::KeywordQueryAnalyzer;
use crate::config::{Config, ConfigLoader};
use crate::drafting::{GeneratorDeps, ReportDrafter, Tier2Generator};
use crate::profile::SqliteProfileLoader;
use crate::retrieval::SqliteRetriever;
use crate::storage::{Database, SharedDatabase, SqliteMetadataStore};
use crate::templates::{SharedCatalog, TemplateCatalog};
use crate::types::Result;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json, yaml",
                s
            )),
        }
    }
}

/// Print `value` as JSON or YAML. Returns `false` for text output, which the
/// caller renders itself.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
        OutputFormat::Text => Ok(false),
    }
}

/// Command execution context
///
/// Loaded configuration plus the metadata database it points at.
#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub db: SharedDatabase,
    pub catalog: SharedCatalog,
}

impl CommandContext {
    /// Load config and open (creating if needed) the metadata database
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::load()?;
        config.validate()?;
        let db = Database::open(&config.storage.database_path)?;

        Ok(Self {
            config,
            db: Arc::new(db),
            catalog: Arc::new(TemplateCatalog::builtin()),
        })
    }

    pub fn store(&self) -> SqliteMetadataStore {
        SqliteMetadataStore::new(self.db.clone())
    }

    /// Wire the SQLite collaborators and the configured LLM into a generator
    pub fn generator(&self) -> Result<Tier2Generator> {
        let deps = GeneratorDeps {
            analyzer: Arc::new(KeywordQueryAnalyzer::new()),
            profiles: Arc::new(SqliteProfileLoader::new(self.db.clone())),
            retriever: Arc::new(SqliteRetriever::new(self.db.clone())),
            llm: create_llm_client(&self.config.llm)?,
            catalog: self.catalog.clone(),
        };
        Ok(Tier2Generator::from_config(deps, &self.config))
    }

    pub fn report_drafter(&self) -> Result<ReportDrafter> {
        Ok(ReportDrafter::new(
            self.generator()?,
            Arc::new(self.store()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("yaml".parse::<OutputFormat>(), Ok(OutputFormat::Yaml));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
