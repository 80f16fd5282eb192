//! Templates Command
//!
//! List the built-in template catalog.

use crate::cli::ui::Output;
use crate::cli::util::{OutputFormat, print_structured};
use crate::templates::TemplateCatalog;
use crate::types::Result;

pub fn run(format: OutputFormat) -> Result<()> {
    let catalog = TemplateCatalog::builtin();
    if print_structured(&catalog.templates(), format)? {
        return Ok(());
    }

    let out = Output::new();
    for doc_type in catalog.doc_types() {
        out.section(doc_type);
        for t in catalog.templates().iter().filter(|t| t.doc_type == doc_type) {
            let scope = match (&t.section_type, &t.engineering_function) {
                (None, _) => "generic".to_string(),
                (Some(s), None) => s.clone(),
                (Some(s), Some(f)) => format!("{} / {}", s, f),
            };
            let keys: Vec<&str> = t.outline.iter().map(|s| s.key.as_str()).collect();
            println!("  {:<24} {}", scope, keys.join(", "));
        }
    }
    Ok(())
}
