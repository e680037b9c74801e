//! Schema management.

use crate::error::StoreResult;
use rusqlite::Connection;
use tracing::info;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StoreResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating initial store schema...");
        create_initial_schema(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> StoreResult<()> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn create_initial_schema(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        r#"
        -- One row per ingested input
        CREATE TABLE IF NOT EXISTS source_records (
            id TEXT PRIMARY KEY,
            origin TEXT NOT NULL,
            modality TEXT NOT NULL,
            raw_metadata TEXT NOT NULL DEFAULT '{}',
            extracted_text TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL,
            error_detail TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_records_status ON source_records(status);
        CREATE INDEX IF NOT EXISTS idx_records_created ON source_records(created_at);

        -- Full-text search over extracted text
        CREATE VIRTUAL TABLE IF NOT EXISTS records_fts USING fts5(
            extracted_text,
            content='source_records',
            content_rowid='rowid'
        );

        -- Triggers to keep FTS in sync
        CREATE TRIGGER IF NOT EXISTS records_ai AFTER INSERT ON source_records BEGIN
            INSERT INTO records_fts(rowid, extracted_text)
            VALUES (NEW.rowid, NEW.extracted_text);
        END;

        CREATE TRIGGER IF NOT EXISTS records_ad AFTER DELETE ON source_records BEGIN
            INSERT INTO records_fts(records_fts, rowid, extracted_text)
            VALUES('delete', OLD.rowid, OLD.extracted_text);
        END;

        CREATE TRIGGER IF NOT EXISTS records_au AFTER UPDATE ON source_records BEGIN
            INSERT INTO records_fts(records_fts, rowid, extracted_text)
            VALUES('delete', OLD.rowid, OLD.extracted_text);
            INSERT INTO records_fts(rowid, extracted_text)
            VALUES (NEW.rowid, NEW.extracted_text);
        END;

        -- Question/answer history
        CREATE TABLE IF NOT EXISTS saved_queries (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            answer TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_queries_created ON saved_queries(created_at);
        "#,
    )?;

    Ok(())
}
