//! Metadata Store
//!
//! Read surface used for section ordering (`document_templates`, distinct
//! chunk section types) plus the write helpers used by ingestion.

use chrono::Utc;
use rusqlite::{OptionalExtension, params};
use serde::{Deserialize, Serialize};

use super::database::SharedDatabase;
use crate::types::{ChunkType, StoreError};

/// Read-only queries the report drafter needs.
///
/// Errors are limited to [`StoreError`] so callers can degrade on connector
/// failures without masking anything else.
pub trait MetadataStore: Send + Sync {
    /// Stored section order for `(company_id, doc_type)`, if a template row exists
    fn template_section_order(
        &self,
        company_id: &str,
        doc_type: &str,
    ) -> Result<Option<Vec<String>>, StoreError>;

    /// Distinct non-empty section types in stored chunks, in discovery order
    fn distinct_section_types(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
    ) -> Result<Vec<String>, StoreError>;
}

/// A chunk to be written into the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewChunk {
    /// Generated when absent
    pub id: Option<String>,
    pub company_id: String,
    pub artifact_id: Option<String>,
    pub version_id: Option<String>,
    pub doc_type: Option<String>,
    pub section_type: Option<String>,
    pub chunk_type: Option<ChunkType>,
    pub heading: Option<String>,
    pub page_number: Option<u32>,
    pub text: String,
}

/// SQLite-backed metadata store
#[derive(Clone)]
pub struct SqliteMetadataStore {
    db: SharedDatabase,
}

impl SqliteMetadataStore {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Insert or replace the section order template for a company/doc type
    pub fn upsert_template(
        &self,
        company_id: &str,
        doc_type: &str,
        section_order: &[String],
    ) -> Result<(), StoreError> {
        let order_json =
            serde_json::to_string(section_order).map_err(|source| StoreError::Decode {
                column: "section_order",
                source,
            })?;
        let now = Utc::now().to_rfc3339();

        self.db.conn()?.execute(
            "INSERT INTO document_templates (company_id, doc_type, section_order, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (company_id, doc_type)
             DO UPDATE SET section_order = excluded.section_order,
                           updated_at = excluded.updated_at",
            params![company_id, doc_type, order_json, now],
        )?;
        Ok(())
    }

    /// Insert chunks in one transaction, returning their ids
    pub fn insert_chunks(&self, chunks: &[NewChunk]) -> Result<Vec<String>, StoreError> {
        let mut conn = self.db.conn()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(chunks.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (id, company_id, artifact_id, version_id, doc_type,
                     section_type, chunk_type, heading, page_number, text, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;

            for chunk in chunks {
                let id = chunk
                    .id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                let chunk_type = chunk.chunk_type.unwrap_or(ChunkType::Content);
                stmt.execute(params![
                    id,
                    chunk.company_id,
                    chunk.artifact_id,
                    chunk.version_id,
                    chunk.doc_type,
                    chunk.section_type,
                    chunk_type.as_str(),
                    chunk.heading,
                    chunk.page_number,
                    chunk.text,
                    Utc::now().to_rfc3339(),
                ])?;
                ids.push(id);
            }
        }

        tx.commit()?;
        Ok(ids)
    }
}

impl MetadataStore for SqliteMetadataStore {
    fn template_section_order(
        &self,
        company_id: &str,
        doc_type: &str,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let conn = self.db.conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT section_order FROM document_templates
                 WHERE company_id = ?1 AND doc_type = ?2
                 ORDER BY updated_at DESC LIMIT 1",
                params![company_id, doc_type],
                |row| row.get(0),
            )
            .optional()?;

        raw.map(|json| {
            serde_json::from_str::<Vec<String>>(&json).map_err(|source| StoreError::Decode {
                column: "section_order",
                source,
            })
        })
        .transpose()
    }

    fn distinct_section_types(
        &self,
        company_id: &str,
        doc_type: Option<&str>,
    ) -> Result<Vec<String>, StoreError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT LOWER(TRIM(section_type)) AS key FROM chunks
             WHERE company_id = ?1
               AND (?2 IS NULL OR doc_type = ?2)
               AND section_type IS NOT NULL
               AND TRIM(section_type) <> ''
             GROUP BY key
             ORDER BY MIN(rowid)",
        )?;

        let rows = stmt.query_map(params![company_id, doc_type], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }
}
