//! Tier-2 section generator.
//!
//! One `draft_section` call analyses the request, applies overrides, loads
//! the length profile, retrieves content then style chunks, and picks exactly
//! one of three modes:
//!
//! | content | section template-safe | mode                 | LLM calls |
//! |---------|-----------------------|----------------------|-----------|
//! | yes     | any                   | `Grounded`           | 1-2       |
//! | no      | yes                   | `Template`           | 1-2       |
//! | no      | no                    | `SkippedNoContent`   | 0         |

use std::time::Duration;

use tracing::{info, instrument};

use super::length::{ChatSettings, enforce_length};
use super::prompts::{
    GROUNDED_SYSTEM_PROMPT, SectionContext, TEMPLATE_SYSTEM_PROMPT, grounded_prompt,
    template_prompt,
};
use super::types::{
    Citation, DraftMode, SectionDebug, SectionDraftResult, SectionLengthTarget, SectionOutcome,
};
use crate::ai::SharedLlmClient;
use crate::analyzer::SharedQueryAnalyzer;
use crate::config::{Config, DraftingConfig};
use crate::constants::drafting::{DEFAULT_DOC_TYPE, GENERIC_SECTION, SKIPPED_SECTION_TEXT};
use crate::constants::network::DEFAULT_TIMEOUT_SECS;
use crate::constants::sections::TEMPLATE_SAFE_SECTIONS;
use crate::profile::SharedProfileLoader;
use crate::retrieval::{FallbackRetrieval, SharedRetriever, retrieve_with_fallbacks};
use crate::templates::SharedCatalog;
use crate::types::{ChunkType, DocRequest, DraftOverrides, Result};

const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Collaborators injected into the generator
#[derive(Clone)]
pub struct GeneratorDeps {
    pub analyzer: SharedQueryAnalyzer,
    pub profiles: SharedProfileLoader,
    pub retriever: SharedRetriever,
    pub llm: SharedLlmClient,
    pub catalog: SharedCatalog,
}

#[derive(Clone)]
pub struct Tier2Generator {
    deps: GeneratorDeps,
    drafting: DraftingConfig,
    chat: ChatSettings,
}

impl Tier2Generator {
    pub fn new(deps: GeneratorDeps) -> Self {
        Self {
            deps,
            drafting: DraftingConfig::default(),
            chat: ChatSettings {
                temperature: DEFAULT_TEMPERATURE,
                timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            },
        }
    }

    /// Generator tuned by the `[drafting]` and `[llm]` config sections
    pub fn from_config(deps: GeneratorDeps, config: &Config) -> Self {
        Self::new(deps)
            .with_drafting(config.drafting.clone())
            .with_temperature(config.llm.temperature)
            .with_timeout(Duration::from_secs(config.llm.timeout_secs))
    }

    pub fn with_drafting(mut self, drafting: DraftingConfig) -> Self {
        self.drafting = drafting;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.chat.temperature = temperature;
        self
    }

    /// Upper bound on every LLM call made while drafting
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.chat.timeout = timeout;
        self
    }

    /// Draft one section.
    ///
    /// Analyzer, profile, retriever and LLM failures propagate unchanged.
    /// Zero retrieved content is a mode, never an error.
    #[instrument(skip(self, user_request, overrides))]
    pub async fn draft_section(
        &self,
        company_id: &str,
        user_request: &str,
        overrides: &DraftOverrides,
    ) -> Result<SectionDraftResult> {
        let analysis = self.deps.analyzer.analyze(user_request).await?;

        let request = overrides.resolve(
            company_id,
            user_request,
            analysis.doc_type,
            analysis.section_type,
            analysis.engineering_function,
        );
        let doc_type = request.doc_type.as_deref();
        let section_type = request.section_type.as_deref();

        let profile = self
            .deps
            .profiles
            .load(company_id, doc_type, section_type)
            .await?;
        let length_target = profile.length_target();

        let template = self.deps.catalog.match_template(
            doc_type.unwrap_or(DEFAULT_DOC_TYPE),
            section_type,
            request.engineering_function.as_deref(),
        );
        let query = retrieval_query(
            user_request,
            section_type,
            template.retrieval_hint(section_type),
        );

        let content = self
            .retrieve(
                &request,
                &query,
                ChunkType::Content,
                self.drafting.content_top_k,
            )
            .await?;
        let style = self
            .retrieve(&request, &query, ChunkType::Style, self.drafting.style_top_k)
            .await?;

        let mut warnings = content.warnings.clone();
        warnings.extend(style.warnings.iter().cloned());

        let section_name = section_type.unwrap_or(GENERIC_SECTION);
        let ctx = SectionContext {
            doc_type,
            section_type: section_name,
            engineering_function: request.engineering_function.as_deref(),
            user_request,
            length_target: &length_target,
            template,
        };
        let llm = self.deps.llm.as_ref();

        let (mode, draft_text, citations, outcome) = if !content.chunks.is_empty() {
            let raw = self
                .chat
                .chat(
                    llm,
                    GROUNDED_SYSTEM_PROMPT,
                    &grounded_prompt(&ctx, &content.chunks, &style.chunks),
                    self.drafting.grounded_max_tokens,
                    "grounded section draft",
                )
                .await?;
            let text = enforce_length(
                llm,
                &self.chat,
                &raw,
                &length_target,
                self.drafting.rewrite_max_tokens,
            )
            .await?;
            let citations: Vec<Citation> = content.chunks.iter().map(Citation::from).collect();
            (DraftMode::Grounded, text, citations, SectionOutcome::Generated)
        } else if is_template_safe(section_type) {
            warnings.push(format!(
                "No grounding content for section '{}'; generated using template-safe mode \
                 (no new facts, use [TBD] for specifics).",
                section_name
            ));
            let raw = self
                .chat
                .chat(
                    llm,
                    TEMPLATE_SYSTEM_PROMPT,
                    &template_prompt(&ctx, &style.chunks),
                    self.drafting.template_max_tokens,
                    "template-safe section draft",
                )
                .await?;
            let text = enforce_length(
                llm,
                &self.chat,
                &raw,
                &length_target,
                self.drafting.rewrite_max_tokens,
            )
            .await?;
            (DraftMode::Template, text, Vec::new(), SectionOutcome::Generated)
        } else {
            warnings.push(format!(
                "No grounding content for section '{}'; skipped.",
                section_name
            ));
            (
                DraftMode::SkippedNoContent,
                SKIPPED_SECTION_TEXT.to_string(),
                Vec::new(),
                SectionOutcome::Skipped {
                    reason: "insufficient source content".to_string(),
                },
            )
        };

        info!(
            section = section_name,
            mode = %mode,
            content_chunks = content.chunks.len(),
            style_chunks = style.chunks.len(),
            "Drafted section"
        );

        Ok(SectionDraftResult {
            draft_text,
            doc_type: request.doc_type.clone(),
            section_type: request.section_type.clone(),
            length_target: SectionLengthTarget {
                min_chars: length_target.min_chars,
                max_chars: length_target.max_chars,
            },
            citations,
            warnings,
            debug: SectionDebug {
                content_chunks_used: content.chunks.len(),
                content_source: content.source,
                style_chunks_used: style.chunks.len(),
                style_source: style.source,
                mode,
            },
            outcome,
        })
    }

    async fn retrieve(
        &self,
        request: &DocRequest,
        query: &str,
        chunk_type: ChunkType,
        top_k: usize,
    ) -> Result<FallbackRetrieval> {
        retrieve_with_fallbacks(
            self.deps.retriever.as_ref(),
            query,
            &request.company_id,
            chunk_type,
            top_k,
            request.doc_type.as_deref(),
            request.section_type.as_deref(),
            request.artifact_id.as_deref(),
        )
        .await
    }
}

fn is_template_safe(section_type: Option<&str>) -> bool {
    section_type.is_some_and(|s| TEMPLATE_SAFE_SECTIONS.contains(&s))
}

/// Request text plus the section name and template hint
fn retrieval_query(user_request: &str, section_type: Option<&str>, hint: Option<&str>) -> String {
    let mut query = user_request.trim().to_string();
    if let Some(section) = section_type {
        query.push(' ');
        query.push_str(&section.replace('_', " "));
    }
    if let Some(hint) = hint {
        query.push(' ');
        query.push_str(hint);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::LlmClient;
    use crate::drafting::testing::*;
    use crate::templates::TemplateCatalog;
    use crate::types::{DraftError, Override};
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    struct Fixture {
        llm: Arc<ScriptedLlm>,
        retriever: Arc<MapRetriever>,
        profiles: Arc<FixedProfileLoader>,
        generator: Tier2Generator,
    }

    fn fixture(
        analyzer: FixedAnalyzer,
        retriever: MapRetriever,
        profiles: FixedProfileLoader,
        llm: ScriptedLlm,
    ) -> Fixture {
        let llm = Arc::new(llm);
        let retriever = Arc::new(retriever);
        let profiles = Arc::new(profiles);
        let generator = Tier2Generator::new(GeneratorDeps {
            analyzer: Arc::new(analyzer),
            profiles: profiles.clone(),
            retriever: retriever.clone(),
            llm: llm.clone(),
            catalog: Arc::new(TemplateCatalog::builtin()),
        });
        Fixture {
            llm,
            retriever,
            profiles,
            generator,
        }
    }

    fn overrides(doc_type: &str, section_type: &str) -> DraftOverrides {
        DraftOverrides::new()
            .doc_type(doc_type)
            .section_type(section_type)
    }

    fn assert_mode_invariants(result: &SectionDraftResult) {
        match result.debug.mode {
            DraftMode::Grounded => {
                assert_eq!(result.citations.len(), result.debug.content_chunks_used)
            }
            DraftMode::Template | DraftMode::SkippedNoContent => {
                assert!(result.citations.is_empty())
            }
        }
    }

    #[tokio::test]
    async fn test_template_safe_intro_without_content() {
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new().with_style(chunks("s", ChunkType::Style, 2)),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![
                "This section introduces the project and its purpose. Specifics are [TBD].",
            ]),
        );

        let result = f
            .generator
            .draft_section("acme", "write it", &overrides("design_report", "introduction"))
            .await
            .unwrap();

        assert_eq!(result.debug.mode, DraftMode::Template);
        assert!(!result.draft_text.is_empty());
        assert!(!result.draft_text.chars().any(|c| c.is_ascii_digit()));
        assert!(result.citations.is_empty());
        assert!(result.warnings.iter().any(|w| w.contains("template-safe mode")));
        assert_eq!(result.debug.style_chunks_used, 2);
        assert_eq!(result.outcome, SectionOutcome::Generated);
        assert_eq!(f.llm.calls(), 1);
        assert_eq!(f.llm.system_prompt(0), TEMPLATE_SYSTEM_PROMPT);
        assert!(!f.llm.user_prompt(0).contains("# Source excerpts"));
        assert_mode_invariants(&result);
    }

    #[tokio::test]
    async fn test_results_without_content_is_skipped_with_no_llm_call() {
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new().with_style(chunks("s", ChunkType::Style, 2)),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![]),
        );

        let result = f
            .generator
            .draft_section("acme", "write it", &overrides("design_report", "results"))
            .await
            .unwrap();

        assert_eq!(result.debug.mode, DraftMode::SkippedNoContent);
        assert_eq!(result.draft_text, "[TBD – insufficient source content]");
        assert_eq!(f.llm.calls(), 0);
        assert!(result.is_skipped());
        assert_eq!(
            result.warnings.last().map(String::as_str),
            Some("No grounding content for section 'results'; skipped.")
        );
        assert_mode_invariants(&result);
    }

    #[tokio::test]
    async fn test_grounded_long_draft_is_rewritten_once() {
        let original = "x".repeat(600);
        let rewritten = "r".repeat(300);
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new().with_content("methodology", chunks("c", ChunkType::Content, 5)),
            FixedProfileLoader::new(Some(200), Some(400)),
            ScriptedLlm::new(vec![original.as_str(), rewritten.as_str()]),
        );

        let result = f
            .generator
            .draft_section("acme", "methodology", &overrides("design_report", "methodology"))
            .await
            .unwrap();

        assert_eq!(result.debug.mode, DraftMode::Grounded);
        assert_eq!(f.llm.calls(), 2);
        let rewrite = f.llm.user_prompt(1);
        assert!(rewrite.contains("200") && rewrite.contains("400"));
        assert_eq!(result.draft_text, rewritten);
        assert_eq!(result.citations.len(), 5);
        assert_eq!(result.citations[0].chunk_id.as_deref(), Some("c0"));
        assert_eq!(
            result.length_target,
            SectionLengthTarget {
                min_chars: Some(200),
                max_chars: Some(400)
            }
        );
        assert_eq!(result.debug.content_source, "section+doc_type");
        assert_mode_invariants(&result);
    }

    #[tokio::test]
    async fn test_grounded_within_bounds_makes_one_call() {
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new().with_content("findings", chunks("c", ChunkType::Content, 2)),
            FixedProfileLoader::new(Some(5), Some(100)),
            ScriptedLlm::new(vec!["  Cracking was observed at the abutment.  "]),
        );

        let result = f
            .generator
            .draft_section("acme", "findings", &overrides("design_report", "findings"))
            .await
            .unwrap();

        assert_eq!(f.llm.calls(), 1);
        assert_eq!(result.draft_text, "Cracking was observed at the abutment.");
        assert_eq!(f.llm.system_prompt(0), GROUNDED_SYSTEM_PROMPT);
        assert!(f.llm.user_prompt(0).contains("Source sentence."));
    }

    #[tokio::test]
    async fn test_template_gate_only_for_safe_sections() {
        for section in ["findings", "results", "recommendations", "conclusion", "appendix"] {
            let f = fixture(
                FixedAnalyzer::new(None, None),
                MapRetriever::new(),
                FixedProfileLoader::empty(),
                ScriptedLlm::new(vec![]),
            );
            let result = f
                .generator
                .draft_section("acme", "x", &overrides("design_report", section))
                .await
                .unwrap();
            assert_eq!(result.debug.mode, DraftMode::SkippedNoContent, "{}", section);
        }

        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new(),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![]),
        );
        let result = f
            .generator
            .draft_section("acme", "x", &DraftOverrides::new())
            .await
            .unwrap();
        assert_eq!(result.debug.mode, DraftMode::SkippedNoContent);
        assert_eq!(
            result.warnings.last().map(String::as_str),
            Some("No grounding content for section 'section'; skipped.")
        );
    }

    #[tokio::test]
    async fn test_overrides_replace_inferred_values() {
        let f = fixture(
            FixedAnalyzer::new(Some("proposal"), Some("scope")),
            MapRetriever::new(),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![]),
        );

        let ov = DraftOverrides {
            doc_type: Override::Clear,
            section_type: Override::Set("results".to_string()),
            ..Default::default()
        };
        let result = f.generator.draft_section("acme", "x", &ov).await.unwrap();

        assert_eq!(result.doc_type, None);
        assert_eq!(result.section_type.as_deref(), Some("results"));
        assert_eq!(
            f.profiles.requests.lock().unwrap()[0],
            (None, Some("results".to_string()))
        );

        let inherited = f
            .generator
            .draft_section("acme", "x", &DraftOverrides::new())
            .await
            .unwrap();
        assert_eq!(inherited.doc_type.as_deref(), Some("proposal"));
        assert_eq!(inherited.section_type.as_deref(), Some("scope"));
        assert_eq!(inherited.debug.mode, DraftMode::Template);
    }

    #[tokio::test]
    async fn test_retrieval_order_and_warnings() {
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new(),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![]),
        );
        let result = f
            .generator
            .draft_section("acme", "x", &overrides("design_report", "results"))
            .await
            .unwrap();

        // three empty content attempts, then three empty style attempts
        assert_eq!(f.retriever.calls.load(Ordering::SeqCst), 6);
        let seen = f.retriever.seen.lock().unwrap();
        assert!(seen[..3].iter().all(|s| s.index_type == ChunkType::Content));
        assert!(seen[3..].iter().all(|s| s.index_type == ChunkType::Style));
        assert_eq!(result.debug.content_source, "company");
        assert_eq!(result.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_resolved_request_drives_every_retrieval() {
        let f = fixture(
            FixedAnalyzer::new(Some("proposal"), Some("scope")),
            MapRetriever::new(),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec![]),
        );
        let ov = DraftOverrides::new().section_type("results").artifact_id("rpt-7");
        f.generator.draft_section("acme", "x", &ov).await.unwrap();

        let seen = f.retriever.seen.lock().unwrap();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|s| s.company_id == "acme"));
        assert!(seen.iter().all(|s| s.artifact_id.as_deref() == Some("rpt-7")));
        assert_eq!(seen[0].doc_type.as_deref(), Some("proposal"));
        assert_eq!(seen[0].section_type.as_deref(), Some("results"));
    }

    #[tokio::test]
    async fn test_empty_style_adds_no_warning() {
        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new()
                .with_content("scope", chunks("c", ChunkType::Content, 1))
                .with_style(vec![]),
            FixedProfileLoader::empty(),
            ScriptedLlm::new(vec!["Scope text."]),
        );
        let result = f
            .generator
            .draft_section("acme", "x", &overrides("design_report", "scope"))
            .await
            .unwrap();
        assert_eq!(result.debug.mode, DraftMode::Grounded);
        assert_eq!(result.debug.style_source, "company");
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_collaborator_errors_propagate() {
        let generator = Tier2Generator::new(GeneratorDeps {
            analyzer: Arc::new(FailingAnalyzer),
            profiles: Arc::new(FixedProfileLoader::empty()),
            retriever: Arc::new(MapRetriever::new()),
            llm: Arc::new(ScriptedLlm::new(vec![])),
            catalog: Arc::new(TemplateCatalog::builtin()),
        });
        let err = generator
            .draft_section("acme", "x", &DraftOverrides::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Analysis(_)));

        let generator = Tier2Generator::new(GeneratorDeps {
            analyzer: Arc::new(FixedAnalyzer::new(None, None)),
            profiles: Arc::new(FixedProfileLoader::empty()),
            retriever: Arc::new(FailingRetriever),
            llm: Arc::new(ScriptedLlm::new(vec![])),
            catalog: Arc::new(TemplateCatalog::builtin()),
        });
        let err = generator
            .draft_section("acme", "x", &DraftOverrides::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Retrieval(_)));

        let f = fixture(
            FixedAnalyzer::new(None, None),
            MapRetriever::new().with_content("scope", chunks("c", ChunkType::Content, 1)),
            FixedProfileLoader::empty(),
            ScriptedLlm::failing(),
        );
        let err = f
            .generator
            .draft_section("acme", "x", &overrides("design_report", "scope"))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Llm(_)));
    }

    #[tokio::test]
    async fn test_llm_call_times_out() {
        let llm: Arc<dyn LlmClient> = Arc::new(HangingLlm);
        let generator = Tier2Generator::new(GeneratorDeps {
            analyzer: Arc::new(FixedAnalyzer::new(None, None)),
            profiles: Arc::new(FixedProfileLoader::empty()),
            retriever: Arc::new(
                MapRetriever::new().with_content("scope", chunks("c", ChunkType::Content, 1)),
            ),
            llm,
            catalog: Arc::new(TemplateCatalog::builtin()),
        })
        .with_timeout(Duration::from_millis(50));

        let err = generator
            .draft_section("acme", "x", &overrides("design_report", "scope"))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::Timeout { .. }));
    }

    #[test]
    fn test_retrieval_query() {
        assert_eq!(
            retrieval_query(" draft it ", Some("executive_summary"), Some("key findings")),
            "draft it executive summary key findings"
        );
        assert_eq!(retrieval_query("draft", None, None), "draft");
    }
}
