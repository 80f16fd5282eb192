//! Template Catalog
//!
//! Static registry of section outlines and voice rules keyed by
//! `(doc_type, section_type, engineering_function)`.
//!
//! Matching is deterministic and total: the first registered definition is
//! the unconditional fallback, so a catalog can never be built empty.

mod builtin;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{DraftError, Result};

/// One outline entry of a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub key: String,
    pub title: String,
    pub required: bool,
    pub guidance: Option<String>,
}

impl TemplateSection {
    pub fn new(key: &str, title: &str, required: bool, guidance: Option<&str>) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            required,
            guidance: guidance.map(String::from),
        }
    }
}

/// Voice constraints applied to every drafted section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRules {
    pub tone: String,
    pub person: String,
    pub tense: String,
    pub avoid: Vec<String>,
}

impl Default for VoiceRules {
    fn default() -> Self {
        Self {
            tone: "formal, technical".to_string(),
            person: "third person".to_string(),
            tense: "present tense for findings, past tense for work performed".to_string(),
            avoid: vec![
                "marketing language".to_string(),
                "unsupported superlatives".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub doc_type: String,
    pub section_type: Option<String>,
    pub engineering_function: Option<String>,
    pub outline: Vec<TemplateSection>,
    pub voice: VoiceRules,
    /// Extra retrieval terms keyed by section type, `"*"` for any section
    pub retrieval_hints: HashMap<String, String>,
}

impl TemplateDefinition {
    /// Outline entry for a section, if the template lists one
    pub fn section(&self, section_type: &str) -> Option<&TemplateSection> {
        self.outline.iter().find(|s| s.key == section_type)
    }

    /// Retrieval hint for a section, falling back to the wildcard hint
    pub fn retrieval_hint(&self, section_type: Option<&str>) -> Option<&str> {
        section_type
            .and_then(|s| self.retrieval_hints.get(s))
            .or_else(|| self.retrieval_hints.get("*"))
            .map(String::as_str)
    }
}

/// Shared, immutable catalog handle
pub type SharedCatalog = Arc<TemplateCatalog>;

/// Immutable template registry
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<TemplateDefinition>,
}

impl TemplateCatalog {
    /// Build a catalog. The first definition becomes the unconditional fallback.
    pub fn new(templates: Vec<TemplateDefinition>) -> Result<Self> {
        if templates.is_empty() {
            return Err(DraftError::Config(
                "Template catalog requires at least one definition".to_string(),
            ));
        }
        Ok(Self { templates })
    }

    /// Catalog with the built-in engineering document templates
    pub fn builtin() -> Self {
        Self {
            templates: builtin::definitions(),
        }
    }

    /// Find the best template for a request.
    ///
    /// Priority: exact triple, then `(doc_type, section_type)`, then
    /// `doc_type`, then the first registered template.
    pub fn match_template(
        &self,
        doc_type: &str,
        section_type: Option<&str>,
        engineering_function: Option<&str>,
    ) -> &TemplateDefinition {
        let exact = self.templates.iter().find(|t| {
            t.doc_type == doc_type
                && t.section_type.as_deref() == section_type
                && t.engineering_function.as_deref() == engineering_function
        });

        exact
            .or_else(|| {
                self.templates
                    .iter()
                    .find(|t| t.doc_type == doc_type && t.section_type.as_deref() == section_type)
            })
            .or_else(|| self.templates.iter().find(|t| t.doc_type == doc_type))
            .unwrap_or(&self.templates[0])
    }

    /// Registered doc types in registration order, deduplicated
    pub fn doc_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for t in &self.templates {
            if !seen.contains(&t.doc_type.as_str()) {
                seen.push(&t.doc_type);
            }
        }
        seen
    }

    pub fn templates(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn def(doc: &str, section: Option<&str>, function: Option<&str>) -> TemplateDefinition {
        TemplateDefinition {
            doc_type: doc.to_string(),
            section_type: section.map(String::from),
            engineering_function: function.map(String::from),
            outline: vec![],
            voice: VoiceRules::default(),
            retrieval_hints: HashMap::new(),
        }
    }

    fn catalog() -> TemplateCatalog {
        TemplateCatalog::new(vec![
            def("design_report", None, None),
            def("design_report", Some("methodology"), None),
            def("design_report", Some("methodology"), Some("structural")),
            def("proposal", None, None),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_triple_wins() {
        let c = catalog();
        let t = c.match_template("design_report", Some("methodology"), Some("structural"));
        assert_eq!(t.engineering_function.as_deref(), Some("structural"));
    }

    #[test]
    fn test_doc_and_section_match() {
        let c = catalog();
        let t = c.match_template("design_report", Some("methodology"), Some("electrical"));
        assert_eq!(t.section_type.as_deref(), Some("methodology"));
        assert_eq!(t.engineering_function, None);
    }

    #[test]
    fn test_doc_type_only_match() {
        let c = catalog();
        let t = c.match_template("proposal", Some("scope"), None);
        assert_eq!(t.doc_type, "proposal");
    }

    #[test]
    fn test_unknown_doc_type_falls_back_to_first() {
        let c = catalog();
        let t = c.match_template("site_memo", None, None);
        assert_eq!(t, &c.templates()[0]);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            TemplateCatalog::new(vec![]),
            Err(DraftError::Config(_))
        ));
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let c = TemplateCatalog::builtin();
        assert!(!c.is_empty());
        assert_eq!(c.templates()[0].doc_type, "design_report");
        assert!(c.doc_types().contains(&"calculation_narrative"));
        assert!(c.doc_types().contains(&"proposal"));
    }

    #[test]
    fn test_retrieval_hint_wildcard() {
        let mut t = def("proposal", None, None);
        t.retrieval_hints
            .insert("*".to_string(), "client deliverables".to_string());
        t.retrieval_hints
            .insert("scope".to_string(), "scope of services".to_string());
        assert_eq!(t.retrieval_hint(Some("scope")), Some("scope of services"));
        assert_eq!(t.retrieval_hint(Some("findings")), Some("client deliverables"));
        assert_eq!(t.retrieval_hint(None), Some("client deliverables"));
    }

    proptest! {
        #[test]
        fn prop_match_is_total(
            doc in "[a-z_]{0,16}",
            section in proptest::option::of("[a-z_]{0,12}"),
            function in proptest::option::of("[a-z]{0,10}"),
        ) {
            let c = TemplateCatalog::builtin();
            let t = c.match_template(&doc, section.as_deref(), function.as_deref());
            if !c.doc_types().contains(&doc.as_str()) {
                prop_assert_eq!(t, &c.templates()[0]);
            } else {
                prop_assert_eq!(&t.doc_type, &doc);
            }
        }
    }
}
