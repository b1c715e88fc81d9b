//! SQLite database schema for tally

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, TallyError};

pub const CURRENT_SCHEMA_VERSION: i32 = 2;

const SCHEMA_SQL: &str = r#"
-- Rubrics are stored whole as JSON; an edit appends a row with a higher
-- version and never rewrites an existing one
CREATE TABLE IF NOT EXISTS rubrics (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    scope TEXT NOT NULL,
    version INTEGER NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (id, version)
);
CREATE INDEX IF NOT EXISTS idx_rubrics_scope ON rubrics(scope);

CREATE TABLE IF NOT EXISTS events (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    rubric_id TEXT NOT NULL,
    rubric_version INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Teams taking part in an event, with or without submissions
CREATE TABLE IF NOT EXISTS event_teams (
    event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
    team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    PRIMARY KEY (event_id, team_id)
);

CREATE TABLE IF NOT EXISTS submissions (
    id TEXT PRIMARY KEY,
    team_id TEXT NOT NULL REFERENCES teams(id),
    event_id TEXT NOT NULL REFERENCES events(id),
    submitted_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_submissions_event ON submissions(event_id);
CREATE INDEX IF NOT EXISTS idx_submissions_team ON submissions(team_id);

-- One row per (submission, judge), always written as a whole row
CREATE TABLE IF NOT EXISTS score_records (
    submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
    judge_id TEXT NOT NULL,
    event_id TEXT NOT NULL,
    values_json TEXT NOT NULL DEFAULT '{}',
    comment TEXT,
    total REAL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (submission_id, judge_id)
);
CREATE INDEX IF NOT EXISTS idx_score_records_event ON score_records(event_id);

CREATE TABLE IF NOT EXISTS leaderboard_snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_id TEXT NOT NULL,
    calculated_at TEXT NOT NULL,
    digest TEXT NOT NULL,
    body TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_snapshots_event ON leaderboard_snapshots(event_id, calculated_at);

CREATE TABLE IF NOT EXISTS snapshot_entries (
    snapshot_id INTEGER NOT NULL REFERENCES leaderboard_snapshots(id) ON DELETE CASCADE,
    team_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    PRIMARY KEY (snapshot_id, team_id)
);
CREATE INDEX IF NOT EXISTS idx_snapshot_entries_team ON snapshot_entries(team_id);

CREATE TABLE IF NOT EXISTS store_meta (
    key TEXT PRIMARY KEY,
    value TEXT
);
"#;

/// Version 1 kept one rubric row per id and did not pin events to a version
const MIGRATE_V1_SQL: &str = r#"
ALTER TABLE rubrics RENAME TO rubrics_v1;
CREATE TABLE rubrics (
    id TEXT NOT NULL,
    name TEXT NOT NULL,
    scope TEXT NOT NULL,
    version INTEGER NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (id, version)
);
INSERT INTO rubrics (id, name, scope, version, body)
    SELECT id, name, scope, version, body FROM rubrics_v1;
DROP TABLE rubrics_v1;
ALTER TABLE events ADD COLUMN rubric_version INTEGER NOT NULL DEFAULT 1;
UPDATE events SET rubric_version = COALESCE(
    (SELECT MAX(version) FROM rubrics WHERE rubrics.id = events.rubric_id), 1);
"#;

pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i32>> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'store_meta'",
        [],
        |r| r.get(0),
    )?;
    if !exists {
        return Ok(None);
    }
    conn.query_row(
        "SELECT value FROM store_meta WHERE key = 'schema_version'",
        [],
        |r| r.get::<_, String>(0).map(|s| s.parse().unwrap_or(0)),
    )
    .optional()
}

/// Create the schema, or bring an older one up to date.
///
/// A store written by a newer schema is refused rather than rewritten; the
/// database is the only copy of the scores.
pub fn create_schema(conn: &Connection) -> Result<()> {
    let current = read_schema_version(conn)
        .map_err(|e| TallyError::db_operation("read schema version", e))?;

    match current {
        Some(v) if v == CURRENT_SCHEMA_VERSION => Ok(()),
        Some(v) if v > CURRENT_SCHEMA_VERSION => Err(TallyError::unsupported(
            "store schema version",
            v,
            format!("<= {}", CURRENT_SCHEMA_VERSION),
        )),
        previous => {
            if previous == Some(1) {
                conn.execute_batch(MIGRATE_V1_SQL)
                    .map_err(|e| crate::map_db_err!("migrate schema from version 1", e))?;
            }
            conn.execute_batch(SCHEMA_SQL)
                .map_err(|e| crate::map_db_err!("create database schema", e))?;
            conn.execute(
                "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('schema_version', ?1)",
                [&CURRENT_SCHEMA_VERSION.to_string()],
            )?;
            if let Some(v) = previous {
                tracing::info!(
                    "Database schema updated from version {} to {}",
                    v,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(())
        }
    }
}

#[cfg(test)]
pub fn force_set_schema_version(conn: &Connection, version: i32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO store_meta (key, value) VALUES ('schema_version', ?1)",
        [&version.to_string()],
    )?;
    Ok(())
}
