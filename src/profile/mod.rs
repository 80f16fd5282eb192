//! Section Length Profiles
//!
//! Historical chunk statistics per `(company, doc_type, section_type)` and
//! the length target derived from them. An empty history yields an
//! all-absent profile, which disables length enforcement.

mod sqlite;

pub use sqlite::SqliteProfileLoader;

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Shared profile loader
pub type SharedProfileLoader = Arc<dyn SectionProfileLoader>;

/// Aggregated chunk statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionProfile {
    pub count: usize,
    pub avg_chars: Option<f64>,
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
    pub avg_sentences: Option<f64>,
    pub avg_sentence_length: Option<f64>,
    pub avg_paragraphs: Option<f64>,
}

/// Length bounds for a drafted section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthTarget {
    pub min_chars: Option<usize>,
    pub max_chars: Option<usize>,
    pub avg_sentences: Option<usize>,
    pub avg_sentence_length: Option<f64>,
    pub avg_paragraphs: Option<usize>,
}

impl LengthTarget {
    /// Both bounds, when history supplied them
    pub fn bounds(&self) -> Option<(usize, usize)> {
        match (self.min_chars, self.max_chars) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.bounds().is_none()
    }
}

impl From<&SectionProfile> for LengthTarget {
    fn from(profile: &SectionProfile) -> Self {
        Self {
            min_chars: profile.min_chars,
            max_chars: profile.max_chars,
            avg_sentences: profile.avg_sentences.map(|v| v.round() as usize),
            avg_sentence_length: profile.avg_sentence_length,
            avg_paragraphs: profile.avg_paragraphs.map(|v| v.round() as usize),
        }
    }
}

/// Produces length profiles from historical chunks
#[async_trait]
pub trait SectionProfileLoader: Send + Sync {
    async fn load(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
        section_type: Option<&str>,
    ) -> Result<SectionProfile>;
}

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?]+(\s+|$)").expect("sentence regex is valid")
});

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph regex is valid"));

/// Number of sentences; text without terminal punctuation counts as one.
pub fn count_sentences(text: &str) -> usize {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }
    let ends = SENTENCE_END.find_iter(text).count();
    let trailing = !SENTENCE_END
        .find_iter(text)
        .last()
        .is_some_and(|m| m.end() == text.len());
    ends + usize::from(trailing)
}

pub fn count_paragraphs(text: &str) -> usize {
    PARAGRAPH_BREAK
        .split(text.trim())
        .filter(|p| !p.trim().is_empty())
        .count()
}

impl SectionProfile {
    /// Aggregate statistics from historical chunk texts
    pub fn from_texts<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut count = 0usize;
        let mut total_chars = 0usize;
        let mut min_chars = usize::MAX;
        let mut max_chars = 0usize;
        let mut total_sentences = 0usize;
        let mut total_paragraphs = 0usize;

        for text in texts {
            let chars = text.trim().chars().count();
            count += 1;
            total_chars += chars;
            min_chars = min_chars.min(chars);
            max_chars = max_chars.max(chars);
            total_sentences += count_sentences(text);
            total_paragraphs += count_paragraphs(text);
        }

        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        Self {
            count,
            avg_chars: Some(total_chars as f64 / n),
            min_chars: Some(min_chars),
            max_chars: Some(max_chars),
            avg_sentences: Some(total_sentences as f64 / n),
            avg_sentence_length: (total_sentences > 0)
                .then(|| total_chars as f64 / total_sentences as f64),
            avg_paragraphs: Some(total_paragraphs as f64 / n),
        }
    }

    pub fn length_target(&self) -> LengthTarget {
        LengthTarget::from(self)
    }
}
