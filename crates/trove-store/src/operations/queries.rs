//! Question/answer history operations.

use crate::database::Store;
use crate::error::StoreError;
use crate::error::StoreResult;
use chrono::{DateTime, Utc};
use rusqlite::params;

/// A persisted question and its synthesized answer.
#[derive(Debug, Clone)]
pub struct SavedQuery {
    pub id: String,
    pub question: String,
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Store {
    /// Save a question and its answer to history.
    pub fn save_query(&self, question: &str, answer: Option<&str>) -> StoreResult<SavedQuery> {
        let saved = SavedQuery {
            id: trove_core::new_id(),
            question: question.to_string(),
            answer: answer.map(|s| s.to_string()),
            created_at: Utc::now(),
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO saved_queries (id, question, answer, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                saved.id,
                saved.question,
                saved.answer,
                saved.created_at.to_rfc3339()
            ],
        )?;

        Ok(saved)
    }

    /// List recent queries, newest first.
    pub fn list_queries(&self, limit: i64) -> StoreResult<Vec<SavedQuery>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, question, answer, created_at FROM saved_queries
             ORDER BY created_at DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            let created_at_str: String = row.get(3)?;
            Ok(SavedQuery {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
                created_at: DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}
