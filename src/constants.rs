//! Global Constants
//!
//! Centralized constants for drafting, retrieval, and networking.

/// Section ordering constants
pub mod sections {
    /// Canonical section order, also the last-resort report outline
    pub const DEFAULT_SECTION_ORDER: &[&str] = &[
        "executive_summary",
        "introduction",
        "scope",
        "methodology",
        "findings",
        "results",
        "recommendations",
        "limitations",
        "conclusion",
        "appendix",
    ];

    /// Used when stored chunks reveal too few section types to trust
    pub const SAFETY_FALLBACK_SECTIONS: &[&str] = &[
        "introduction",
        "scope",
        "methodology",
        "findings",
        "recommendations",
        "limitations",
        "conclusion",
    ];

    /// Minimum distinct inferred section types before the inferred order is used
    pub const MIN_INFERRED_SECTIONS: usize = 4;

    /// Sections that may be drafted without grounding content
    pub const TEMPLATE_SAFE_SECTIONS: &[&str] = &["introduction", "scope", "methodology"];
}

/// Drafting constants
pub mod drafting {
    /// Content chunks retrieved per section
    pub const CONTENT_TOP_K: usize = 6;

    /// Style chunks retrieved per section
    pub const STYLE_TOP_K: usize = 4;

    /// Text of a section skipped for lack of grounding
    pub const SKIPPED_SECTION_TEXT: &str = "[TBD – insufficient source content]";

    /// Placeholder the model is told to use for unknown specifics
    pub const TBD_MARKER: &str = "[TBD]";

    /// Name used in prompts and warnings when no section type is known
    pub const GENERIC_SECTION: &str = "section";

    pub const GROUNDED_MAX_TOKENS: u32 = 1200;
    pub const TEMPLATE_MAX_TOKENS: u32 = 500;
    pub const REWRITE_MAX_TOKENS: u32 = 1200;

    /// Default doc type when nothing in the request names one
    pub const DEFAULT_DOC_TYPE: &str = "design_report";

    /// Characters of each chunk quoted into a prompt
    pub const MAX_CHUNK_CHARS_IN_PROMPT: usize = 1800;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Maximum retries for transient provider failures
    pub const MAX_NETWORK_RETRIES: usize = 3;

    /// Base delay for provider retry backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between provider retries (seconds)
    pub const RETRY_MAX_DELAY_SECS: u64 = 30;
}
