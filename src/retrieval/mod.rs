//! Retrieval
//!
//! `Retriever` is the similarity-search boundary. The drafting pipeline only
//! talks to it through [`retrieve_with_fallbacks`], which relaxes filters
//! until something comes back.

mod fallback;
mod sqlite;

pub use fallback::{FallbackRetrieval, retrieve_with_fallbacks};
pub use sqlite::SqliteRetriever;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::{ChunkType, Result, RetrievedChunk};

/// Shared retriever
pub type SharedRetriever = Arc<dyn Retriever>;

/// Metadata filters for one retrieval attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievalFilters {
    pub company_id: String,
    pub index_type: ChunkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
}

impl RetrievalFilters {
    pub fn new(company_id: &str, index_type: ChunkType) -> Self {
        Self {
            company_id: company_id.to_string(),
            index_type,
            doc_type: None,
            section_type: None,
            artifact_id: None,
        }
    }

    /// Diagnostic scope label: `section`, `doc_type`, `artifact` joined by
    /// `+`, or `company` when none of them apply.
    pub fn source_label(&self) -> String {
        let mut parts = Vec::new();
        if self.section_type.is_some() {
            parts.push("section");
        }
        if self.doc_type.is_some() {
            parts.push("doc_type");
        }
        if self.artifact_id.is_some() {
            parts.push("artifact");
        }
        if parts.is_empty() {
            "company".to_string()
        } else {
            parts.join("+")
        }
    }
}

/// Embeds a query and runs filtered similarity search
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve_for_query(
        &self,
        query_text: &str,
        company_id: &str,
        chunk_type: ChunkType,
        top_k: usize,
        filters: &RetrievalFilters,
    ) -> Result<Vec<RetrievedChunk>>;
}
