//! Multi-section report assembly.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use super::generator::Tier2Generator;
use super::ordering::get_section_order;
use super::types::{
    ReportDraftResult, ReportMeta, ReportSection, SectionSource, SectionStatus,
    SectionStatusEntry,
};
use crate::analyzer::resolve_doc_type;
use crate::storage::MetadataStore;
use crate::types::{DraftOverrides, Result};

/// Drafts every section of a report in order and stitches them together
#[derive(Clone)]
pub struct ReportDrafter {
    generator: Tier2Generator,
    store: Arc<dyn MetadataStore>,
}

impl ReportDrafter {
    pub fn new(generator: Tier2Generator, store: Arc<dyn MetadataStore>) -> Self {
        Self { generator, store }
    }

    pub fn generator(&self) -> &Tier2Generator {
        &self.generator
    }

    /// Section order for a report, with its provenance
    pub fn section_order(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
    ) -> (Vec<String>, SectionSource) {
        get_section_order(self.store.as_ref(), company_id, doc_type)
    }

    /// Draft a full report.
    ///
    /// Sections are drafted one at a time in order. Each call gets the
    /// report's doc type and its own section type, with `overrides` layered
    /// on top. The first generation failure aborts the report.
    #[instrument(skip(self, user_request, overrides))]
    pub async fn draft_report(
        &self,
        company_id: &str,
        user_request: &str,
        doc_type: Option<&str>,
        overrides: &DraftOverrides,
    ) -> Result<ReportDraftResult> {
        let doc_type = resolve_doc_type(doc_type, user_request);
        let (section_order, section_source) = self.section_order(company_id, Some(&doc_type));

        info!(
            doc_type = %doc_type,
            source = %section_source,
            sections = section_order.len(),
            "Drafting report"
        );

        let mut sections = Vec::new();
        let mut section_status = Vec::with_capacity(section_order.len());
        let mut warnings = Vec::new();

        for section_type in &section_order {
            let section_overrides = overrides.clone().layered_over(
                DraftOverrides::new()
                    .doc_type(doc_type.as_str())
                    .section_type(section_type.as_str()),
            );
            let result = self
                .generator
                .draft_section(company_id, user_request, &section_overrides)
                .await?;

            warnings.extend(result.warnings.iter().cloned());
            let status = if result.is_skipped() {
                SectionStatus::Skipped
            } else {
                SectionStatus::Generated
            };
            section_status.push(SectionStatusEntry {
                section_type: section_type.clone(),
                status,
                debug: result.debug.clone(),
            });

            if status == SectionStatus::Generated {
                sections.push(ReportSection {
                    section_type: section_type.clone(),
                    text: result.draft_text,
                    citations: result.citations,
                });
            }
        }

        let combined_text = combine_sections(&sections);
        info!(
            generated = sections.len(),
            skipped = section_status.len() - sections.len(),
            warnings = warnings.len(),
            "Report drafted"
        );

        Ok(ReportDraftResult {
            company_id: company_id.to_string(),
            doc_type,
            sections,
            section_status,
            section_order: section_order.clone(),
            combined_text,
            warnings,
            meta: ReportMeta {
                section_source,
                generated_at: Utc::now().to_rfc3339(),
                section_order,
            },
        })
    }
}

/// `executive_summary` -> `Executive Summary`
pub fn section_title(section_type: &str) -> String {
    let mut title = String::with_capacity(section_type.len());
    let mut prev_is_letter = false;
    for c in section_type.replace('_', " ").chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            title.push(c);
            prev_is_letter = false;
        }
    }
    title
}

fn combine_sections(sections: &[ReportSection]) -> String {
    sections
        .iter()
        .map(|s| format!("{}\n{}", section_title(&s.section_type), s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
