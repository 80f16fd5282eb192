//! Order Command
//!
//! Show the section order a report would use, and where it came from.

use crate::analyzer::resolve_doc_type;
use crate::cli::util::{CommandContext, OutputFormat, print_structured};
use crate::drafting::get_section_order;
use crate::types::Result;

pub fn run(company: &str, doc_type: Option<&str>, format: OutputFormat) -> Result<()> {
    let ctx = CommandContext::load()?;
    let doc_type = resolve_doc_type(doc_type, "");
    let (order, source) = get_section_order(&ctx.store(), company, Some(&doc_type));

    let value = serde_json::json!({
        "company_id": company,
        "doc_type": doc_type,
        "source": source,
        "section_order": order,
    });
    if print_structured(&value, format)? {
        return Ok(());
    }

    println!("{} / {} (source: {})", company, doc_type, source);
    for (i, section) in order.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, section);
    }
    Ok(())
}
