//! Section Command
//!
//! Draft a single section.
//!
//! Usage:
//!   reportdraft section "<request>" --company acme [--doc-type design_report]
//!       [--section-type methodology] [--function structural] [--artifact id] [-f json]

use console::style;

use crate::cli::ui::Output;
use crate::cli::util::{CommandContext, OutputFormat, print_structured};
use crate::drafting::SectionDraftResult;
use crate::types::{DraftOverrides, Override, Result};

pub struct SectionArgs {
    pub request: String,
    pub company: String,
    pub doc_type: Option<String>,
    pub section_type: Option<String>,
    pub function: Option<String>,
    pub artifact: Option<String>,
    pub format: OutputFormat,
}

impl SectionArgs {
    fn overrides(&self) -> DraftOverrides {
        DraftOverrides {
            doc_type: Override::from(self.doc_type.clone()),
            section_type: Override::from(self.section_type.clone()),
            engineering_function: Override::from(self.function.clone()),
            artifact_id: Override::from(self.artifact.clone()),
        }
    }
}

pub async fn run(args: SectionArgs) -> Result<()> {
    let ctx = CommandContext::load()?;
    let generator = ctx.generator()?;
    let result = generator
        .draft_section(&args.company, &args.request, &args.overrides())
        .await?;

    if !print_structured(&result, args.format)? {
        print_text(&result);
    }
    Ok(())
}

fn print_text(result: &SectionDraftResult) {
    let out = Output::new();
    let section = result.section_type.as_deref().unwrap_or("section");
    out.header(&format!(
        "{} ({})",
        crate::drafting::section_title(section),
        result.debug.mode
    ));
    println!("{}", result.draft_text);

    if !result.citations.is_empty() {
        out.section("Citations");
        for (i, c) in result.citations.iter().enumerate() {
            println!(
                "  [{}] {} {}{}",
                i + 1,
                c.artifact_id.as_deref().unwrap_or("-"),
                c.heading.as_deref().unwrap_or("untitled"),
                c.page_number
                    .map(|p| format!(" (p. {})", p))
                    .unwrap_or_default()
            );
        }
    }

    for warning in &result.warnings {
        out.warning(warning);
    }
    println!(
        "\n{}",
        style(format!(
            "content: {} from {} | style: {} from {}",
            result.debug.content_chunks_used,
            result.debug.content_source,
            result.debug.style_chunks_used,
            result.debug.style_source
        ))
        .dim()
    );
}
