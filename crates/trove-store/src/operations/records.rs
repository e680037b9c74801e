//! Source record operations.

use crate::database::Store;
use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use rusqlite::params;
use trove_core::{Modality, SourceRecord, SourceStatus};

impl Store {
    /// Insert or replace a source record; idempotent under the same id.
    ///
    /// `created_at` of an existing row is preserved, everything else is
    /// replaced in one statement, so a reader never observes a partial
    /// update.
    pub fn upsert_record(&self, record: &SourceRecord) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO source_records
                (id, origin, modality, raw_metadata, extracted_text, status,
                 error_detail, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(id) DO UPDATE SET
                origin = excluded.origin,
                modality = excluded.modality,
                raw_metadata = excluded.raw_metadata,
                extracted_text = excluded.extracted_text,
                status = excluded.status,
                error_detail = excluded.error_detail,
                updated_at = excluded.updated_at
            "#,
            params![
                record.id,
                record.origin,
                record.modality.as_str(),
                record.raw_metadata.to_string(),
                record.extracted_text,
                record.status.as_str(),
                record.error_detail,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get a record by id.
    pub fn get_record(&self, id: &str) -> StoreResult<SourceRecord> {
        let conn = self.conn()?;
        conn.query_row(
            &format!("SELECT {} FROM source_records WHERE id = ?1", RECORD_COLUMNS),
            params![id],
            row_to_record,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                StoreError::NotFound(format!("Record not found: {}", id))
            }
            _ => StoreError::from(e),
        })
    }

    /// List all records in stable insertion order.
    pub fn list_records(&self) -> StoreResult<Vec<SourceRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM source_records ORDER BY created_at, id",
            RECORD_COLUMNS
        ))?;
        let records = stmt.query_map([], row_to_record)?;
        records
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    /// Full-text candidates for the given query terms.
    ///
    /// Only processed records can match; failed and pending records carry
    /// no searchable text. Result order follows insertion order so the
    /// retriever's tie-break stays stable.
    pub fn search_records(&self, terms: &[String]) -> StoreResult<Vec<SourceRecord>> {
        if terms.is_empty() {
            return Ok(vec![]);
        }

        // Quote each token so FTS5 treats it as a plain term
        let fts_query = terms
            .iter()
            .map(|t| format!("\"{}\"", t.replace('"', "")))
            .collect::<Vec<_>>()
            .join(" OR ");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {}
            FROM source_records r
            INNER JOIN records_fts fts ON fts.rowid = r.rowid
            WHERE records_fts MATCH ?1 AND r.status = 'processed'
            ORDER BY r.created_at, r.id
            "#,
            RECORD_COLUMNS_QUALIFIED
        ))?;

        let records = stmt.query_map(params![fts_query], row_to_record)?;
        records
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    /// Number of stored records.
    pub fn record_count(&self) -> StoreResult<i64> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM source_records", [], |row| row.get(0))
            .map_err(StoreError::from)
    }

    /// Delete all records and query history. Irreversible.
    pub fn clear(&self) -> StoreResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM source_records", [])?;
        tx.execute("DELETE FROM saved_queries", [])?;
        tx.commit()?;
        Ok(())
    }
}

const RECORD_COLUMNS: &str = "id, origin, modality, raw_metadata, extracted_text, status, \
                              error_detail, created_at, updated_at";

const RECORD_COLUMNS_QUALIFIED: &str =
    "r.id, r.origin, r.modality, r.raw_metadata, r.extracted_text, r.status, \
     r.error_detail, r.created_at, r.updated_at";

fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<SourceRecord> {
    let modality_str: String = row.get(2)?;
    let metadata_str: String = row.get(3)?;
    let status_str: String = row.get(5)?;
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    Ok(SourceRecord {
        id: row.get(0)?,
        origin: row.get(1)?,
        modality: Modality::from_str(&modality_str).unwrap_or(Modality::Document),
        raw_metadata: serde_json::from_str(&metadata_str).unwrap_or_default(),
        extracted_text: row.get(4)?,
        status: SourceStatus::from_str(&status_str).unwrap_or(SourceStatus::Failed),
        error_detail: row.get(6)?,
        created_at: parse_timestamp(&created_at_str),
        updated_at: parse_timestamp(&updated_at_str),
    })
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(origin: &str, text: &str) -> SourceRecord {
        let mut record = SourceRecord::pending(origin, Modality::Document);
        record.mark_processed(text.to_string(), serde_json::json!({}));
        record
    }

    #[test]
    fn test_upsert_then_get_round_trip() {
        let store = Store::open_in_memory().unwrap();

        let record = processed("/docs/a.txt", "The capital of France is Paris.");
        store.upsert_record(&record).unwrap();

        let fetched = store.get_record(&record.id).unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.origin, record.origin);
        assert_eq!(fetched.modality, record.modality);
        assert_eq!(fetched.extracted_text, record.extracted_text);
        assert_eq!(fetched.status, SourceStatus::Processed);
        assert_eq!(fetched.error_detail, None);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let err = store.get_record("no-such-id").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let store = Store::open_in_memory().unwrap();

        let first = processed("/docs/a.txt", "version one");
        store.upsert_record(&first).unwrap();

        let mut second = processed("/docs/a.txt", "version two");
        second.created_at = first.created_at;
        store.upsert_record(&second).unwrap();

        let all = store.list_records().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].extracted_text, "version two");
    }

    #[test]
    fn test_list_order_is_stable() {
        let store = Store::open_in_memory().unwrap();

        let a = processed("/docs/a.txt", "alpha");
        let b = processed("/docs/b.txt", "beta");
        store.upsert_record(&a).unwrap();
        store.upsert_record(&b).unwrap();

        let first = store.list_records().unwrap();
        let second = store.list_records().unwrap();
        let ids: Vec<_> = first.iter().map(|r| r.id.clone()).collect();
        let ids2: Vec<_> = second.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, ids2);
        assert_eq!(first.len(), 2);
        assert_eq!(store.record_count().unwrap(), 2);
    }

    #[test]
    fn test_search_matches_extracted_text() {
        let store = Store::open_in_memory().unwrap();

        store
            .upsert_record(&processed("/docs/paris.txt", "The capital of France is Paris."))
            .unwrap();
        store
            .upsert_record(&processed("/docs/rust.txt", "Rust has a borrow checker."))
            .unwrap();

        let hits = store
            .search_records(&["france".to_string(), "capital".to_string()])
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].origin.contains("paris"));
    }

    #[test]
    fn test_search_excludes_failed_records() {
        let store = Store::open_in_memory().unwrap();

        let mut failed = SourceRecord::pending("/docs/bad.pdf", Modality::Document);
        failed.mark_failed("truncated");
        store.upsert_record(&failed).unwrap();

        let hits = store.search_records(&["truncated".to_string()]).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_after_update_sees_new_text() {
        let store = Store::open_in_memory().unwrap();

        let mut record = processed("/docs/a.txt", "old content here");
        store.upsert_record(&record).unwrap();

        record.mark_processed("completely fresh words".to_string(), serde_json::json!({}));
        store.upsert_record(&record).unwrap();

        assert!(store.search_records(&["old".to_string()]).unwrap().is_empty());
        assert_eq!(store.search_records(&["fresh".to_string()]).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = Store::open_in_memory().unwrap();

        store.upsert_record(&processed("/docs/a.txt", "alpha")).unwrap();
        store.save_query("q", Some("a")).unwrap();

        store.clear().unwrap();

        assert!(store.list_records().unwrap().is_empty());
        assert!(store.list_queries(10).unwrap().is_empty());
    }
}
