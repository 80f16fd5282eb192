//! Draft result types for sections and reports.

use serde::{Deserialize, Serialize};

use crate::types::RetrievedChunk;

/// Which branch produced a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftMode {
    /// Backed by retrieved content chunks
    Grounded,
    /// Fact-free placeholder prose for a template-safe section
    Template,
    /// No content and not template-safe; no LLM call
    SkippedNoContent,
}

impl DraftMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftMode::Grounded => "grounded",
            DraftMode::Template => "template",
            DraftMode::SkippedNoContent => "skipped_no_content",
        }
    }
}

impl std::fmt::Display for DraftMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a section made it into the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionOutcome {
    Generated,
    Skipped { reason: String },
}

/// Source reference for one content chunk used in a grounded draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub artifact_id: Option<String>,
    pub version_id: Option<String>,
    pub heading: Option<String>,
    pub page_number: Option<u32>,
    pub chunk_id: Option<String>,
    pub score: f32,
}

impl From<&RetrievedChunk> for Citation {
    fn from(chunk: &RetrievedChunk) -> Self {
        let meta = &chunk.metadata;
        Self {
            artifact_id: meta.artifact_id.clone(),
            version_id: meta.version_id.clone(),
            heading: meta.heading.clone(),
            page_number: meta.page_number,
            chunk_id: meta.chunk_id.clone().or_else(|| Some(chunk.id.clone())),
            score: chunk.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDebug {
    pub content_chunks_used: usize,
    pub content_source: String,
    pub style_chunks_used: usize,
    pub style_source: String,
    pub mode: DraftMode,
}

/// Length bounds reported back with a draft
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLengthTarget {
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDraftResult {
    pub draft_text: String,
    pub doc_type: Option<String>,
    pub section_type: Option<String>,
    pub length_target: SectionLengthTarget,
    pub citations: Vec<Citation>,
    pub warnings: Vec<String>,
    pub debug: SectionDebug,
    pub outcome: SectionOutcome,
}

impl SectionDraftResult {
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Skipped { .. })
    }

    pub fn mode(&self) -> DraftMode {
        self.debug.mode
    }
}

/// A generated section included in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub section_type: String,
    pub text: String,
    pub citations: Vec<Citation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Generated,
    Skipped,
}

/// Audit entry for every attempted section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionStatusEntry {
    pub section_type: String,
    pub status: SectionStatus,
    pub debug: SectionDebug,
}

/// Provenance of a report's section order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSource {
    /// Stored `document_templates` row
    Template,
    /// Distinct section types found in stored chunks
    Inferred,
    /// Too few inferred sections to trust
    SafetyDefault,
    /// Nothing stored at all
    Default,
}

impl SectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionSource::Template => "template",
            SectionSource::Inferred => "inferred",
            SectionSource::SafetyDefault => "safety_default",
            SectionSource::Default => "default",
        }
    }
}

impl std::fmt::Display for SectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub section_source: SectionSource,
    /// RFC 3339, UTC
    pub generated_at: String,
    pub section_order: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraftResult {
    pub company_id: String,
    pub doc_type: String,
    pub sections: Vec<ReportSection>,
    pub section_status: Vec<SectionStatusEntry>,
    pub section_order: Vec<String>,
    pub combined_text: String,
    pub warnings: Vec<String>,
    pub meta: ReportMeta,
}
