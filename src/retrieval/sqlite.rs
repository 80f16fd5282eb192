//! Lexical retriever over the `chunks` table.
//!
//! Scores every chunk matching the metadata filters by the fraction of
//! distinct query terms it contains. Candidates are never dropped for a zero
//! score, so an attempt comes back empty only when its filters match nothing.

use std::collections::HashSet;

use async_trait::async_trait;
use rusqlite::params;

use super::{RetrievalFilters, Retriever};
use crate::storage::SharedDatabase;
use crate::types::{ChunkMetadata, ChunkType, Result, RetrievedChunk, StoreError};

const MIN_TERM_LEN: usize = 3;

#[derive(Clone)]
pub struct SqliteRetriever {
    db: SharedDatabase,
}

struct Candidate {
    chunk: RetrievedChunk,
    rowid: i64,
}

impl SqliteRetriever {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    fn candidates(
        &self,
        chunk_type: ChunkType,
        filters: &RetrievalFilters,
    ) -> std::result::Result<Vec<Candidate>, StoreError> {
        let conn = self.db.conn()?;
        let mut stmt = conn.prepare(
            "SELECT rowid, id, company_id, artifact_id, version_id, doc_type, section_type,
                    heading, page_number, text
             FROM chunks
             WHERE company_id = ?1
               AND chunk_type = ?2
               AND (?3 IS NULL OR doc_type = ?3)
               AND (?4 IS NULL OR LOWER(TRIM(section_type)) = LOWER(TRIM(?4)))
               AND (?5 IS NULL OR artifact_id = ?5)
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map(
            params![
                filters.company_id,
                chunk_type.as_str(),
                filters.doc_type,
                filters.section_type,
                filters.artifact_id,
            ],
            |row| {
                let id: String = row.get(1)?;
                Ok(Candidate {
                    rowid: row.get(0)?,
                    chunk: RetrievedChunk {
                        score: 0.0,
                        text: row.get(9)?,
                        metadata: ChunkMetadata {
                            company_id: row.get(2)?,
                            artifact_id: row.get(3)?,
                            version_id: row.get(4)?,
                            doc_type: row.get(5)?,
                            section_type: row.get(6)?,
                            heading: row.get(7)?,
                            page_number: row.get(8)?,
                            chunk_id: Some(id.clone()),
                            chunk_type: Some(chunk_type),
                        },
                        id,
                    },
                })
            },
        )?;

        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

/// Distinct lowercase alphanumeric terms of at least three characters
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TERM_LEN)
        .map(str::to_lowercase)
        .collect()
}

/// Fraction of query terms present in `text`, in `[0, 1]`
fn overlap_score(query: &HashSet<String>, text: &str) -> f32 {
    if query.is_empty() {
        return 0.0;
    }
    let haystack = terms(text);
    let hits = query.iter().filter(|t| haystack.contains(*t)).count();
    hits as f32 / query.len() as f32
}

#[async_trait]
impl Retriever for SqliteRetriever {
    async fn retrieve_for_query(
        &self,
        query_text: &str,
        _company_id: &str,
        chunk_type: ChunkType,
        top_k: usize,
        filters: &RetrievalFilters,
    ) -> Result<Vec<RetrievedChunk>> {
        let query = terms(query_text);
        let mut candidates = self.candidates(chunk_type, filters)?;

        for candidate in &mut candidates {
            candidate.chunk.score = overlap_score(&query, &candidate.chunk.text);
        }
        candidates.sort_by(|a, b| {
            b.chunk
                .score
                .total_cmp(&a.chunk.score)
                .then(a.rowid.cmp(&b.rowid))
        });

        Ok(candidates
            .into_iter()
            .take(top_k)
            .map(|c| c.chunk)
            .collect())
    }
}
