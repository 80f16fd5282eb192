//! Section order resolution.
//!
//! Ladder: stored template, then inferred chunk section types (when enough
//! of them exist), then the safety outline, then the canonical default.
//! Store failures degrade to the next rung; resolution never fails.

use tracing::{debug, warn};

use super::types::SectionSource;
use crate::constants::sections::{
    DEFAULT_SECTION_ORDER, MIN_INFERRED_SECTIONS, SAFETY_FALLBACK_SECTIONS,
};
use crate::storage::MetadataStore;

fn owned(sections: &[&str]) -> Vec<String> {
    sections.iter().map(|s| s.to_string()).collect()
}

/// Sort known section names by canonical position; unknown names follow in
/// discovery order.
pub fn preferred_sort(sections: Vec<String>) -> Vec<String> {
    let mut sections = sections;
    sections.sort_by_key(|s| {
        DEFAULT_SECTION_ORDER
            .iter()
            .position(|known| *known == s.as_str())
            .unwrap_or(DEFAULT_SECTION_ORDER.len())
    });
    sections
}

pub fn get_section_order(
    store: &dyn MetadataStore,
    company_id: &str,
    doc_type: Option<&str>,
) -> (Vec<String>, SectionSource) {
    if let Some(doc_type) = doc_type {
        match store.template_section_order(company_id, doc_type) {
            Ok(Some(order)) if !order.is_empty() => {
                debug!(
                    company_id,
                    doc_type,
                    sections = order.len(),
                    "Using stored template order"
                );
                return (order, SectionSource::Template);
            }
            Ok(_) => {}
            Err(e) => warn!(company_id, doc_type, "Template lookup failed: {}", e),
        }
    }

    let inferred = match store.distinct_section_types(company_id, doc_type) {
        Ok(sections) => sections,
        Err(e) => {
            warn!(company_id, "Section inference failed: {}", e);
            Vec::new()
        }
    };

    if inferred.len() >= MIN_INFERRED_SECTIONS {
        return (preferred_sort(inferred), SectionSource::Inferred);
    }
    if !inferred.is_empty() {
        debug!(
            company_id,
            found = inferred.len(),
            "Too few inferred sections, using safety outline"
        );
        return (owned(SAFETY_FALLBACK_SECTIONS), SectionSource::SafetyDefault);
    }
    (owned(DEFAULT_SECTION_ORDER), SectionSource::Default)
}
