//! Profile loader backed by the `chunks` table.

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;

use super::{SectionProfile, SectionProfileLoader};
use crate::storage::SharedDatabase;
use crate::types::{ChunkType, Result, StoreError};

/// Aggregates historical content chunk lengths
#[derive(Clone)]
pub struct SqliteProfileLoader {
    db: SharedDatabase,
}

impl SqliteProfileLoader {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    fn chunk_texts(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
        section_type: Option<&str>,
    ) -> std::result::Result<Vec<String>, StoreError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT text FROM chunks
             WHERE company_id = ?1
               AND chunk_type = ?2
               AND (?3 IS NULL OR doc_type = ?3)
               AND (?4 IS NULL OR LOWER(TRIM(section_type)) = LOWER(TRIM(?4)))",
        )?;
        let rows = stmt.query_map(
            params![company_id, ChunkType::Content.as_str(), doc_type, section_type],
            |row| row.get(0),
        )?;
        Ok(rows.collect::<std::result::Result<Vec<String>, _>>()?)
    }
}

#[async_trait]
impl SectionProfileLoader for SqliteProfileLoader {
    async fn load(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
        section_type: Option<&str>,
    ) -> Result<SectionProfile> {
        let texts = self.chunk_texts(company_id, doc_type, section_type)?;
        let profile = SectionProfile::from_texts(texts.iter().map(String::as_str));
        debug!(
            company_id,
            doc_type = doc_type.unwrap_or("-"),
            section_type = section_type.unwrap_or("-"),
            count = profile.count,
            "Loaded section profile"
        );
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Database, NewChunk, SqliteMetadataStore};
    use std::sync::Arc;

    fn seeded() -> SqliteProfileLoader {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let store = SqliteMetadataStore::new(db.clone());
        let chunk = |section: &str, chunk_type: ChunkType, text: &str| NewChunk {
            company_id: "acme".to_string(),
            doc_type: Some("design_report".to_string()),
            section_type: Some(section.to_string()),
            chunk_type: Some(chunk_type),
            text: text.to_string(),
            ..Default::default()
        };
        store
            .insert_chunks(&[
                chunk("scope", ChunkType::Content, "Twenty chars exactly"),
                chunk("scope", ChunkType::Content, "Ten chars!"),
                chunk("scope", ChunkType::Style, "Style chunks are never measured."),
                chunk("findings", ChunkType::Content, "Other section."),
            ])
            .unwrap();
        SqliteProfileLoader::new(db)
    }

    #[tokio::test]
    async fn test_load_filters_by_section_and_content() {
        let loader = seeded();
        let profile = loader
            .load("acme", Some("design_report"), Some("scope"))
            .await
            .unwrap();
        assert_eq!(profile.count, 2);
        assert_eq!(profile.min_chars, Some(10));
        assert_eq!(profile.max_chars, Some(20));
    }

    #[tokio::test]
    async fn test_load_without_section_widens() {
        let loader = seeded();
        let profile = loader.load("acme", Some("design_report"), None).await.unwrap();
        assert_eq!(profile.count, 3);
    }

    #[tokio::test]
    async fn test_load_no_history() {
        let loader = seeded();
        let profile = loader
            .load("acme", Some("proposal"), Some("scope"))
            .await
            .unwrap();
        assert_eq!(profile.count, 0);
        assert!(profile.length_target().is_unconstrained());
    }
}
