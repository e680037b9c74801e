//! Store statistics.

use crate::database::Store;
use crate::error::StoreResult;
use std::collections::HashMap;

/// Counts describing the current store contents.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total_records: i64,
    pub processed: i64,
    pub failed: i64,
    pub pending: i64,
    pub records_by_modality: HashMap<String, i64>,
    pub saved_queries: i64,
}

impl Store {
    /// Gather record and history counts.
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let conn = self.conn()?;

        let total_records: i64 =
            conn.query_row("SELECT COUNT(*) FROM source_records", [], |row| row.get(0))?;

        let mut by_status: HashMap<String, i64> = HashMap::new();
        {
            let mut stmt =
                conn.prepare("SELECT status, COUNT(*) FROM source_records GROUP BY status")?;
            let rows = stmt.query_map([], |row| {
                let status: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((status, count))
            })?;
            for row in rows {
                let (status, count) = row?;
                by_status.insert(status, count);
            }
        }

        let mut records_by_modality = HashMap::new();
        {
            let mut stmt =
                conn.prepare("SELECT modality, COUNT(*) FROM source_records GROUP BY modality")?;
            let rows = stmt.query_map([], |row| {
                let modality: String = row.get(0)?;
                let count: i64 = row.get(1)?;
                Ok((modality, count))
            })?;
            for row in rows {
                let (modality, count) = row?;
                records_by_modality.insert(modality, count);
            }
        }

        let saved_queries: i64 =
            conn.query_row("SELECT COUNT(*) FROM saved_queries", [], |row| row.get(0))?;

        Ok(StoreStats {
            total_records,
            processed: by_status.get("processed").copied().unwrap_or(0),
            failed: by_status.get("failed").copied().unwrap_or(0),
            pending: by_status.get("pending").copied().unwrap_or(0),
            records_by_modality,
            saved_queries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_core::{Modality, SourceRecord};

    #[test]
    fn test_stats_counts() {
        let store = Store::open_in_memory().unwrap();

        let mut ok = SourceRecord::pending("/docs/a.txt", Modality::Document);
        ok.mark_processed("text".to_string(), serde_json::json!({}));
        store.upsert_record(&ok).unwrap();

        let mut bad = SourceRecord::pending("/docs/b.png", Modality::Image);
        bad.mark_failed("corrupt");
        store.upsert_record(&bad).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_records, 2);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.records_by_modality.get("image"), Some(&1));
    }
}
