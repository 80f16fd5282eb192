//! Report Command
//!
//! Draft every section of a report and print the combined text.

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, print_structured};
use crate::drafting::{ReportDraftResult, SectionStatus};
use crate::types::{DraftOverrides, Result};

pub async fn run(
    request: &str,
    company: &str,
    doc_type: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let ctx = CommandContext::load()?;
    let drafter = ctx.report_drafter()?;
    let report = drafter
        .draft_report(company, request, doc_type, &DraftOverrides::new())
        .await?;

    if !print_structured(&report, format)? {
        print_text(&report);
    }
    Ok(())
}

fn print_text(report: &ReportDraftResult) {
    let out = Output::new();
    println!("{}", report.combined_text);

    out.section(&format!(
        "Sections ({}, order from {})",
        report.doc_type, report.meta.section_source
    ));
    for entry in &report.section_status {
        let marker = match entry.status {
            SectionStatus::Generated => style("✓").green(),
            SectionStatus::Skipped => style("–").yellow(),
        };
        println!("  {} {} ({})", marker, entry.section_type, entry.debug.mode);
    }

    if !report.warnings.is_empty() {
        out.section("Warnings");
        for warning in &report.warnings {
            out.warning(warning);
        }
    }
}
