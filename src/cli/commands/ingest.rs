//! Ingest Commands
//!
//! Load historical chunks and section-order templates into the metadata
//! database.
//!
//! Usage:
//!   reportdraft ingest chunks.jsonl --company acme
//!   reportdraft template-set --company acme --doc-type design_report introduction scope ...

use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::storage::NewChunk;
use crate::types::{DraftError, Result, ResultExt};

/// Parse JSON Lines chunks; blank lines are ignored. `company` fills in any
/// chunk without a company id.
pub fn parse_chunks(reader: impl BufRead, company: Option<&str>) -> Result<Vec<NewChunk>> {
    let mut chunks = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut chunk: NewChunk = serde_json::from_str(&line).map_err(|e| {
            DraftError::InvalidInput(format!("line {}: {}", index + 1, e))
        })?;
        if chunk.company_id.is_empty() {
            chunk.company_id = company.unwrap_or_default().to_string();
        }
        if chunk.company_id.is_empty() {
            return Err(DraftError::InvalidInput(format!(
                "line {}: company_id missing and no --company given",
                index + 1
            )));
        }
        if chunk.text.trim().is_empty() {
            return Err(DraftError::InvalidInput(format!(
                "line {}: empty chunk text",
                index + 1
            )));
        }
        chunks.push(chunk);
    }
    Ok(chunks)
}

pub fn run(path: &Path, company: Option<&str>) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(format!("cannot read {}", path.display()))?;
    let chunks = parse_chunks(BufReader::new(file), company)?;

    let ctx = CommandContext::load()?;
    let ids = ctx.store().insert_chunks(&chunks)?;
    info!(path = %path.display(), count = ids.len(), "Ingested chunks");

    Output::new().success(&format!(
        "Ingested {} chunks into {}",
        ids.len(),
        ctx.config.storage.database_path.display()
    ));
    Ok(())
}

pub fn set_template(company: &str, doc_type: &str, sections: &[String]) -> Result<()> {
    if sections.is_empty() {
        return Err(DraftError::InvalidInput(
            "at least one section is required".to_string(),
        ));
    }
    let ctx = CommandContext::load()?;
    ctx.store().upsert_template(company, doc_type, sections)?;
    Output::new().success(&format!(
        "Stored {} sections for {} / {}",
        sections.len(),
        company,
        doc_type
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkType;

    #[test]
    fn test_parse_chunks_fills_company() {
        let input = r#"{"text": "The deck spans 40 m.", "section_type": "findings"}

{"company_id": "other", "text": "Formal voice.", "chunk_type": "style"}
"#;
        let chunks = parse_chunks(input.as_bytes(), Some("acme")).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].company_id, "acme");
        assert_eq!(chunks[0].section_type.as_deref(), Some("findings"));
        assert_eq!(chunks[1].company_id, "other");
        assert_eq!(chunks[1].chunk_type, Some(ChunkType::Style));
    }

    #[test]
    fn test_parse_chunks_rejects_bad_lines() {
        let err = parse_chunks(r#"{"text": "x"}"#.as_bytes(), None).unwrap_err();
        assert!(err.to_string().contains("company_id missing"));

        let err = parse_chunks("not json\n".as_bytes(), Some("acme")).unwrap_err();
        assert!(err.to_string().contains("line 1"));

        let err = parse_chunks(r#"{"text": "  "}"#.as_bytes(), Some("acme")).unwrap_err();
        assert!(err.to_string().contains("empty chunk text"));
    }
}
