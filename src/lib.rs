//! reportdraft - Grounded Section Drafting for Engineering Reports
//!
//! Drafts report sections from a company's historical documents. Each
//! section is grounded in retrieved content chunks, written as a fact-free
//! placeholder when it is template-safe, or skipped with an explicit `[TBD`
//! marker when nothing supports it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use reportdraft::{GeneratorDeps, ReportDrafter, Tier2Generator, DraftOverrides};
//!
//! let generator = Tier2Generator::new(GeneratorDeps {
//!     analyzer, profiles, retriever, llm, catalog,
//! });
//! let drafter = ReportDrafter::new(generator, store);
//! let report = drafter
//!     .draft_report("acme", "design report for the footbridge", None, &DraftOverrides::new())
//!     .await?;
//! println!("{}", report.combined_text);
//! ```
//!
//! ## Modules
//!
//! - [`drafting`]: section generator, length enforcement, report assembly
//! - [`retrieval`]: retriever trait and cascading filter fallback
//! - [`templates`]: outline and voice catalog
//! - [`profile`]: historical length profiles
//! - [`analyzer`]: request classification
//! - [`ai`]: LLM clients and prompt construction
//! - [`storage`]: SQLite metadata store with connection pooling
//! - [`config`]: layered configuration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod drafting;
pub mod profile;
pub mod retrieval;
pub mod storage;
pub mod templates;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader, DraftingConfig, LlmConfig, StorageConfig};
pub use types::{DraftError, DraftOverrides, Override, Result, StoreError};

pub use drafting::{
    DraftMode, GeneratorDeps, ReportDraftResult, ReportDrafter, SectionDraftResult,
    SectionOutcome, SectionSource, Tier2Generator,
};

// =============================================================================
// Collaborator Re-exports
// =============================================================================

pub use ai::{LlmClient, SharedLlmClient, create_llm_client};
pub use analyzer::{KeywordQueryAnalyzer, QueryAnalysis, QueryAnalyzer};
pub use profile::{LengthTarget, SectionProfile, SectionProfileLoader, SqliteProfileLoader};
pub use retrieval::{RetrievalFilters, Retriever, SqliteRetriever, retrieve_with_fallbacks};
pub use storage::{Database, MetadataStore, SharedDatabase, SqliteMetadataStore};
pub use templates::{TemplateCatalog, TemplateDefinition};
