//! SQLite database module for tally

mod roster;
mod rubrics;
mod schema;
mod scores;
mod snapshots;

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Connection;
use serde::de::DeserializeOwned;

use crate::error::{Result, TallyError};

pub use schema::{create_schema, CURRENT_SCHEMA_VERSION};

/// File name of the database inside the store directory
pub const DB_FILE: &str = "tally.db";

/// SQLite database for tally
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given store root
    pub fn open(store_root: &Path) -> Result<Self> {
        let db_path = store_root.join(DB_FILE);
        let conn = Connection::open(&db_path).map_err(|e| {
            TallyError::Other(format!(
                "failed to open database at {}: {}",
                db_path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| TallyError::Other(format!("failed to enable WAL mode: {}", e)))?;

        Self::from_connection(conn)
    }

    /// Database that lives only as long as the value; used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| crate::map_db_err!("enable foreign keys", e))?;
        create_schema(&conn)?;
        Ok(Database { conn })
    }

    pub fn schema_version(&self) -> Result<i32> {
        schema::read_schema_version(&self.conn)
            .map_err(|e| crate::map_db_err!("read schema version", e))?
            .ok_or_else(|| TallyError::Other("schema version missing".to_string()))
    }

    pub fn score_record_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM score_records", [], |r| r.get(0))
            .map_err(|e| crate::map_db_err!("count score records", e))
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_json<T: DeserializeOwned>(idx: usize, value: &str) -> rusqlite::Result<T> {
    serde_json::from_str(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests;
