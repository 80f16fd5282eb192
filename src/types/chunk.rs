//! Retrieved chunk types shared by retrievers and the section generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which index a chunk belongs to.
///
/// Content chunks are fact sources; style chunks only carry company voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Content,
    Style,
}

impl ChunkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Content => "content",
            ChunkType::Style => "style",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChunkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "content" => Ok(ChunkType::Content),
            "style" => Ok(ChunkType::Style),
            _ => Err(format!(
                "Unknown chunk type: {}. Valid values: content, style",
                s
            )),
        }
    }
}

/// Provenance carried by every retrieved chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkMetadata {
    pub artifact_id: Option<String>,
    pub version_id: Option<String>,
    pub heading: Option<String>,
    pub page_number: Option<u32>,
    pub chunk_id: Option<String>,
    pub section_type: Option<String>,
    pub doc_type: Option<String>,
    pub company_id: Option<String>,
    pub chunk_type: Option<ChunkType>,
}

/// A chunk returned by a [`Retriever`](crate::retrieval::Retriever).
///
/// Read-only to the drafting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: String,
    pub score: f32,
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl RetrievedChunk {
    /// Heading used when quoting the chunk in a prompt
    pub fn label(&self) -> &str {
        self.metadata.heading.as_deref().unwrap_or("untitled")
    }
}
