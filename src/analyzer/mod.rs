//! Query Analysis
//!
//! Classifies a free-text drafting request into doc type, section type and
//! engineering discipline. [`KeywordQueryAnalyzer`] is a phrase-table
//! classifier; anything smarter plugs in through [`QueryAnalyzer`].

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::drafting::DEFAULT_DOC_TYPE;
use crate::types::Result;

/// Shared query analyzer
pub type SharedQueryAnalyzer = Arc<dyn QueryAnalyzer>;

/// Fields inferred from a request; any of them may be unknown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub doc_type: Option<String>,
    pub section_type: Option<String>,
    pub engineering_function: Option<String>,
}

#[async_trait]
pub trait QueryAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<QueryAnalysis>;
}

// =============================================================================
// Phrase Tables
// =============================================================================

struct PhraseRule {
    value: &'static str,
    phrases: &'static [&'static str],
}

macro_rules! rule {
    ($value:literal, [$($phrase:literal),+ $(,)?]) => {
        PhraseRule {
            value: $value,
            phrases: &[$($phrase),+],
        }
    };
}

/// Checked in order; the first matching rule wins.
const DOC_TYPE_RULES: &[PhraseRule] = &[
    rule!("design_report", ["design report", "rp"]),
    rule!("calculation_narrative", ["calculation"]),
    rule!("proposal", ["proposal", "rfp"]),
];

const SECTION_RULES: &[PhraseRule] = &[
    rule!("executive_summary", ["executive summary", "exec summary"]),
    rule!("introduction", ["introduction", "intro", "background"]),
    rule!("scope", ["scope", "scope of work"]),
    rule!("methodology", ["methodology", "methods", "approach"]),
    rule!("findings", ["findings", "observations"]),
    rule!("results", ["results", "analysis results"]),
    rule!("recommendations", ["recommendations", "recommendation"]),
    rule!("limitations", ["limitations", "assumptions and limitations"]),
    rule!("conclusion", ["conclusion", "conclusions", "summary of conclusions"]),
    rule!("appendix", ["appendix", "appendices"]),
];

const DISCIPLINE_RULES: &[PhraseRule] = &[
    rule!("fire_protection", ["fire protection", "sprinkler"]),
    rule!("structural", ["structural", "structure"]),
    rule!("civil", ["civil", "grading", "drainage"]),
    rule!("mechanical", ["mechanical", "hvac"]),
    rule!("electrical", ["electrical", "power distribution"]),
    rule!("geotechnical", ["geotechnical", "geotech", "soil"]),
    rule!("environmental", ["environmental"]),
    rule!("plumbing", ["plumbing"]),
];

/// Compiled whole-word matchers, one per rule
struct CompiledRules {
    rules: &'static [PhraseRule],
    patterns: Vec<Regex>,
}

impl CompiledRules {
    fn new(rules: &'static [PhraseRule]) -> Self {
        let patterns = rules
            .iter()
            .map(|rule| {
                let alternatives: Vec<String> = rule
                    .phrases
                    .iter()
                    .map(|p| regex::escape(p).replace(' ', r"\s+"))
                    .collect();
                Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))
                    .expect("phrase patterns are escaped")
            })
            .collect();
        Self { rules, patterns }
    }

    /// First rule, in table order, with any phrase in `text`
    fn first_rule(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .zip(&self.patterns)
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(rule, _)| rule.value)
    }

    /// Rule whose phrase occurs earliest in `text`; ties go to table order
    fn earliest_rule(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .zip(&self.patterns)
            .filter_map(|(rule, pattern)| pattern.find(text).map(|m| (m.start(), rule.value)))
            .min_by_key(|(start, _)| *start)
            .map(|(_, value)| value)
    }
}

static DOC_TYPES: LazyLock<CompiledRules> = LazyLock::new(|| CompiledRules::new(DOC_TYPE_RULES));
static SECTIONS: LazyLock<CompiledRules> = LazyLock::new(|| CompiledRules::new(SECTION_RULES));
static DISCIPLINES: LazyLock<CompiledRules> =
    LazyLock::new(|| CompiledRules::new(DISCIPLINE_RULES));

/// Doc type named by a request, if any.
///
/// `rp` and `rfp` count only as whole words.
pub fn infer_doc_type(text: &str) -> Option<&'static str> {
    DOC_TYPES.first_rule(text)
}

/// Doc type for a report: explicit value, else keyword inference, else
/// `design_report`.
pub fn resolve_doc_type(explicit: Option<&str>, text: &str) -> String {
    explicit
        .filter(|d| !d.trim().is_empty())
        .or_else(|| infer_doc_type(text))
        .unwrap_or(DEFAULT_DOC_TYPE)
        .to_string()
}

pub fn infer_section_type(text: &str) -> Option<&'static str> {
    SECTIONS.earliest_rule(text)
}

pub fn infer_engineering_function(text: &str) -> Option<&'static str> {
    DISCIPLINES.first_rule(text)
}

// =============================================================================
// Keyword Analyzer
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordQueryAnalyzer;

impl KeywordQueryAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QueryAnalyzer for KeywordQueryAnalyzer {
    async fn analyze(&self, text: &str) -> Result<QueryAnalysis> {
        Ok(QueryAnalysis {
            doc_type: infer_doc_type(text).map(String::from),
            section_type: infer_section_type(text).map(String::from),
            engineering_function: infer_engineering_function(text).map(String::from),
        })
    }
}
