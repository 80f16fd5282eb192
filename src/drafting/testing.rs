//! Hand-written collaborator doubles for drafting tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ai::LlmClient;
use crate::analyzer::{QueryAnalysis, QueryAnalyzer};
use crate::profile::{SectionProfile, SectionProfileLoader};
use crate::retrieval::{RetrievalFilters, Retriever};
use crate::storage::MetadataStore;
use crate::types::{
    ChunkMetadata, ChunkType, DraftError, ErrorCategory, LlmError, Result, RetrievedChunk,
    StoreError,
};

pub fn chunk(id: &str, chunk_type: ChunkType, text: &str) -> RetrievedChunk {
    RetrievedChunk {
        id: id.to_string(),
        score: 0.8,
        text: text.to_string(),
        metadata: ChunkMetadata {
            artifact_id: Some("artifact-1".to_string()),
            version_id: Some("v1".to_string()),
            heading: Some(format!("Heading {}", id)),
            page_number: Some(4),
            chunk_id: Some(id.to_string()),
            chunk_type: Some(chunk_type),
            ..Default::default()
        },
    }
}

pub fn chunks(prefix: &str, chunk_type: ChunkType, n: usize) -> Vec<RetrievedChunk> {
    (0..n)
        .map(|i| chunk(&format!("{}{}", prefix, i), chunk_type, "Source sentence."))
        .collect()
}

// =============================================================================
// LLM
// =============================================================================

/// Replays scripted responses in order; an exhausted script echoes a default
pub struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<(String, String)>>,
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedLlm {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn system_prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].0.clone()
    }

    pub fn user_prompt(&self, index: usize) -> String {
        self.prompts.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn generate_chat(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        if self.fail {
            return Err(
                LlmError::with_provider(ErrorCategory::Unavailable, "down", "scripted").into(),
            );
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "Drafted section text.".to_string()))
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Never answers; used for timeout tests
pub struct HangingLlm;

#[async_trait]
impl LlmClient for HangingLlm {
    async fn generate_chat(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hanging"
    }

    fn model(&self) -> &str {
        "hanging-model"
    }
}

// =============================================================================
// Analyzer / Profile
// =============================================================================

pub struct FixedAnalyzer {
    pub analysis: QueryAnalysis,
    pub calls: AtomicUsize,
}

impl FixedAnalyzer {
    pub fn new(doc_type: Option<&str>, section_type: Option<&str>) -> Self {
        Self {
            analysis: QueryAnalysis {
                doc_type: doc_type.map(String::from),
                section_type: section_type.map(String::from),
                engineering_function: None,
            },
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl QueryAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<QueryAnalysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.analysis.clone())
    }
}

pub struct FailingAnalyzer;

#[async_trait]
impl QueryAnalyzer for FailingAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<QueryAnalysis> {
        Err(DraftError::Analysis("classifier unavailable".to_string()))
    }
}

/// Returns one profile and records the triple it was asked for
pub struct FixedProfileLoader {
    profile: SectionProfile,
    pub requests: Mutex<Vec<(Option<String>, Option<String>)>>,
}

impl FixedProfileLoader {
    pub fn new(min_chars: Option<usize>, max_chars: Option<usize>) -> Self {
        Self {
            profile: SectionProfile {
                count: usize::from(min_chars.is_some()),
                min_chars,
                max_chars,
                ..Default::default()
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl SectionProfileLoader for FixedProfileLoader {
    async fn load(
        &self,
        _company_id: &str,
        doc_type: Option<&str>,
        section_type: Option<&str>,
    ) -> Result<SectionProfile> {
        self.requests
            .lock()
            .unwrap()
            .push((doc_type.map(String::from), section_type.map(String::from)));
        Ok(self.profile.clone())
    }
}

// =============================================================================
// Retriever
// =============================================================================

/// Serves content and style chunks per section type
#[derive(Default)]
pub struct MapRetriever {
    content: Vec<(Option<String>, Vec<RetrievedChunk>)>,
    style: Vec<RetrievedChunk>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<RetrievalFilters>>,
}

impl MapRetriever {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content returned only when the filter names `section_type`
    pub fn with_content(mut self, section_type: &str, chunks: Vec<RetrievedChunk>) -> Self {
        self.content.push((Some(section_type.to_string()), chunks));
        self
    }

    /// Style returned for any filter
    pub fn with_style(mut self, chunks: Vec<RetrievedChunk>) -> Self {
        self.style = chunks;
        self
    }
}

#[async_trait]
impl Retriever for MapRetriever {
    async fn retrieve_for_query(
        &self,
        _query_text: &str,
        _company_id: &str,
        chunk_type: ChunkType,
        top_k: usize,
        filters: &RetrievalFilters,
    ) -> Result<Vec<RetrievedChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(filters.clone());
        let hits = match chunk_type {
            ChunkType::Style => self.style.clone(),
            ChunkType::Content => self
                .content
                .iter()
                .find(|(section, _)| {
                    filters.section_type.is_some() && *section == filters.section_type
                })
                .map(|(_, chunks)| chunks.clone())
                .unwrap_or_default(),
        };
        Ok(hits.into_iter().take(top_k).collect())
    }
}

pub struct FailingRetriever;

#[async_trait]
impl Retriever for FailingRetriever {
    async fn retrieve_for_query(
        &self,
        _query_text: &str,
        _company_id: &str,
        _chunk_type: ChunkType,
        _top_k: usize,
        _filters: &RetrievalFilters,
    ) -> Result<Vec<RetrievedChunk>> {
        Err(DraftError::Retrieval("index offline".to_string()))
    }
}

// =============================================================================
// Metadata Store
// =============================================================================

#[derive(Default)]
pub struct StubStore {
    pub template: Option<Vec<String>>,
    pub sections: Vec<String>,
    pub fail_template: bool,
    pub fail_sections: bool,
}

impl StubStore {
    pub fn with_sections(sections: &[&str]) -> Self {
        Self {
            sections: sections.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

fn connector_down() -> StoreError {
    StoreError::Database(rusqlite::Error::InvalidQuery)
}

impl MetadataStore for StubStore {
    fn template_section_order(
        &self,
        _company_id: &str,
        _doc_type: &str,
    ) -> std::result::Result<Option<Vec<String>>, StoreError> {
        if self.fail_template {
            return Err(connector_down());
        }
        Ok(self.template.clone())
    }

    fn distinct_section_types(
        &self,
        _company_id: &str,
        _doc_type: Option<&str>,
    ) -> std::result::Result<Vec<String>, StoreError> {
        if self.fail_sections {
            return Err(connector_down());
        }
        Ok(self.sections.clone())
    }
}
