//! Section and Report Drafting
//!
//! [`Tier2Generator`] drafts one section in grounded, template-safe, or
//! skipped mode. [`ReportDrafter`] resolves a section order and runs the
//! generator over it sequentially.

mod generator;
mod length;
mod ordering;
mod prompts;
mod report;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use generator::{GeneratorDeps, Tier2Generator};
pub use ordering::{get_section_order, preferred_sort};
pub use prompts::{GROUNDED_SYSTEM_PROMPT, REWRITE_SYSTEM_PROMPT, TEMPLATE_SYSTEM_PROMPT};
pub use report::{ReportDrafter, section_title};
pub use types::{
    Citation, DraftMode, ReportDraftResult, ReportMeta, ReportSection, SectionDebug,
    SectionDraftResult, SectionLengthTarget, SectionOutcome, SectionSource, SectionStatus,
    SectionStatusEntry,
};
