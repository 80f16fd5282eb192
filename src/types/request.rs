//! Per-call draft request and typed overrides.

use serde::{Deserialize, Serialize};

/// Tri-state override for a single inferred field.
///
/// `Clear` replaces the inferred value with "absent", which is what an
/// explicit null override did upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Override<T> {
    #[default]
    Inherit,
    Set(T),
    Clear,
}

impl<T: Clone> Override<T> {
    /// Resolve against the inferred value. Any non-`Inherit` override wins.
    pub fn apply(&self, inferred: Option<T>) -> Option<T> {
        match self {
            Override::Inherit => inferred,
            Override::Set(value) => Some(value.clone()),
            Override::Clear => None,
        }
    }

    pub fn is_inherit(&self) -> bool {
        matches!(self, Override::Inherit)
    }

    /// Keep `self` unless it inherits, in which case take `base`.
    pub fn or(self, base: Override<T>) -> Override<T> {
        if self.is_inherit() { base } else { self }
    }
}

impl<T> From<Option<T>> for Override<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Override::Set(v),
            None => Override::Inherit,
        }
    }
}

/// Caller overrides for a section or report draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftOverrides {
    pub doc_type: Override<String>,
    pub section_type: Override<String>,
    pub engineering_function: Override<String>,
    /// Restricts every retrieval attempt to one source artifact
    pub artifact_id: Override<String>,
}

impl DraftOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Override::Set(doc_type.into());
        self
    }

    pub fn section_type(mut self, section_type: impl Into<String>) -> Self {
        self.section_type = Override::Set(section_type.into());
        self
    }

    pub fn engineering_function(mut self, function: impl Into<String>) -> Self {
        self.engineering_function = Override::Set(function.into());
        self
    }

    pub fn artifact_id(mut self, artifact_id: impl Into<String>) -> Self {
        self.artifact_id = Override::Set(artifact_id.into());
        self
    }

    /// Layer `self` over `base`: fields set here win, inherited fields fall
    /// back to `base`.
    pub fn layered_over(self, base: DraftOverrides) -> DraftOverrides {
        DraftOverrides {
            doc_type: self.doc_type.or(base.doc_type),
            section_type: self.section_type.or(base.section_type),
            engineering_function: self.engineering_function.or(base.engineering_function),
            artifact_id: self.artifact_id.or(base.artifact_id),
        }
    }

    /// Apply these overrides to the inferred fields. Artifact pinning has
    /// no inferred counterpart.
    pub fn resolve(
        &self,
        company_id: &str,
        user_request: &str,
        doc_type: Option<String>,
        section_type: Option<String>,
        engineering_function: Option<String>,
    ) -> DocRequest {
        DocRequest {
            company_id: company_id.to_string(),
            user_request: user_request.to_string(),
            doc_type: self.doc_type.apply(doc_type),
            section_type: self.section_type.apply(section_type),
            engineering_function: self.engineering_function.apply(engineering_function),
            artifact_id: self.artifact_id.apply(None),
        }
    }
}

/// Fully resolved request for one section draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocRequest {
    pub company_id: String,
    pub user_request: String,
    pub doc_type: Option<String>,
    pub section_type: Option<String>,
    pub engineering_function: Option<String>,
    pub artifact_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_apply() {
        let inferred = Some("scope".to_string());
        assert_eq!(Override::Inherit.apply(inferred.clone()), inferred);
        assert_eq!(
            Override::Set("results".to_string()).apply(inferred.clone()),
            Some("results".to_string())
        );
        assert_eq!(Override::<String>::Clear.apply(inferred), None);
    }

    #[test]
    fn test_layered_over_caller_wins() {
        let base = DraftOverrides::new()
            .doc_type("design_report")
            .section_type("scope");
        let caller = DraftOverrides::new().section_type("findings");

        let merged = caller.layered_over(base);
        assert_eq!(merged.doc_type, Override::Set("design_report".to_string()));
        assert_eq!(merged.section_type, Override::Set("findings".to_string()));
        assert!(merged.engineering_function.is_inherit());
    }

    #[test]
    fn test_resolve_applies_each_override() {
        let overrides = DraftOverrides {
            section_type: Override::Set("results".to_string()),
            engineering_function: Override::Clear,
            ..Default::default()
        }
        .artifact_id("rpt-7");

        let request = overrides.resolve(
            "acme",
            "draft the results",
            Some("proposal".to_string()),
            Some("scope".to_string()),
            Some("structural".to_string()),
        );
        assert_eq!(request.company_id, "acme");
        assert_eq!(request.user_request, "draft the results");
        assert_eq!(request.doc_type.as_deref(), Some("proposal"));
        assert_eq!(request.section_type.as_deref(), Some("results"));
        assert_eq!(request.engineering_function, None);
        assert_eq!(request.artifact_id.as_deref(), Some("rpt-7"));
    }

    #[test]
    fn test_clear_survives_layering() {
        let base = DraftOverrides::new().doc_type("proposal");
        let caller = DraftOverrides {
            doc_type: Override::Clear,
            ..Default::default()
        };
        assert_eq!(caller.layered_over(base).doc_type, Override::Clear);
    }
}
