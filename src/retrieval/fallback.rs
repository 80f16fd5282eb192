//! Cascading filter relaxation.
//!
//! Attempts, most to least specific:
//! 1. company + index + doc_type + section_type
//! 2. company + index + doc_type
//! 3. company + index
//!
//! A caller-pinned artifact stays on every attempt.

use tracing::{debug, warn};

use super::{RetrievalFilters, Retriever};
use crate::types::{ChunkType, Result, RetrievedChunk};

/// Outcome of a fallback retrieval
#[derive(Debug, Clone, Default)]
pub struct FallbackRetrieval {
    pub chunks: Vec<RetrievedChunk>,
    pub warnings: Vec<String>,
    /// Scope label of the filter that produced `chunks`
    pub source: String,
}

fn attempts(
    company_id: &str,
    chunk_type: ChunkType,
    doc_type: Option<&str>,
    section_type: Option<&str>,
    artifact_id: Option<&str>,
) -> [RetrievalFilters; 3] {
    let base = RetrievalFilters {
        artifact_id: artifact_id.map(String::from),
        ..RetrievalFilters::new(company_id, chunk_type)
    };
    let with_doc = RetrievalFilters {
        doc_type: doc_type.map(String::from),
        ..base.clone()
    };
    let with_section = RetrievalFilters {
        section_type: section_type.map(String::from),
        ..with_doc.clone()
    };
    [with_section, with_doc, base]
}

/// Retrieve up to `top_k` chunks, broadening filters until one attempt
/// returns results. All-empty is a normal outcome, not an error.
pub async fn retrieve_with_fallbacks(
    retriever: &dyn Retriever,
    query_text: &str,
    company_id: &str,
    chunk_type: ChunkType,
    top_k: usize,
    doc_type: Option<&str>,
    section_type: Option<&str>,
    artifact_id: Option<&str>,
) -> Result<FallbackRetrieval> {
    let mut warnings = Vec::new();

    for (index, filters) in attempts(company_id, chunk_type, doc_type, section_type, artifact_id)
        .into_iter()
        .enumerate()
    {
        let attempt = index + 1;
        let chunks = retriever
            .retrieve_for_query(query_text, company_id, chunk_type, top_k, &filters)
            .await?;

        debug!(
            chunk_type = %chunk_type,
            attempt,
            scope = %filters.source_label(),
            results = chunks.len(),
            "Retrieval attempt"
        );

        if !chunks.is_empty() {
            if attempt > 1 {
                let message = format!(
                    "{} retrieval fell back to broader filters (attempt {}).",
                    chunk_type, attempt
                );
                warn!("{}", message);
                warnings.push(message);
            }
            return Ok(FallbackRetrieval {
                chunks,
                warnings,
                source: filters.source_label(),
            });
        }
    }

    Ok(FallbackRetrieval {
        chunks: Vec::new(),
        warnings,
        source: "company".to_string(),
    })
}
