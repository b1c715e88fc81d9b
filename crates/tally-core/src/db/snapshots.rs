use rusqlite::params;

use super::{parse_json, Database};
use crate::error::{Result, TallyError};
use crate::leaderboard::Leaderboard;
use crate::source::SnapshotStore;

impl Database {
    fn query_snapshots(&self, sql: &str, key: &str) -> Result<Vec<Leaderboard>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| crate::map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map(params![key], |row| {
                let body: String = row.get(0)?;
                parse_json::<Leaderboard>(0, &body)
            })
            .map_err(|e| crate::map_db_err!("list snapshots", e))?;
        let snapshots = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| crate::map_db_err!("read snapshot", e))?;

        for snapshot in &snapshots {
            snapshot.validate()?;
        }
        Ok(snapshots)
    }
}

impl SnapshotStore for Database {
    fn save_snapshot(&self, leaderboard: &Leaderboard) -> Result<()> {
        leaderboard.validate()?;
        let body = serde_json::to_string(leaderboard)?;

        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TallyError::Other(format!("failed to start transaction: {}", e)))?;
        tx.execute(
            "INSERT INTO leaderboard_snapshots (event_id, calculated_at, digest, body) VALUES (?1, ?2, ?3, ?4)",
            params![
                leaderboard.event_id,
                leaderboard.calculated_at.to_rfc3339(),
                leaderboard.metadata.digest,
                body
            ],
        )
        .map_err(|e| crate::map_db_err!("insert snapshot", e))?;
        let snapshot_id = tx.last_insert_rowid();

        for entry in &leaderboard.entries {
            tx.execute(
                "INSERT INTO snapshot_entries (snapshot_id, team_id, position) VALUES (?1, ?2, ?3)",
                params![snapshot_id, entry.team_id, entry.position],
            )
            .map_err(|e| crate::map_db_err!("insert snapshot entry", e))?;
        }

        tx.commit()
            .map_err(|e| TallyError::Other(format!("failed to commit transaction: {}", e)))?;

        tracing::info!(
            event_id = %leaderboard.event_id,
            entries = leaderboard.len(),
            digest = %leaderboard.metadata.digest,
            "saved leaderboard snapshot"
        );
        Ok(())
    }

    fn snapshots_for_event(&self, event_id: &str) -> Result<Vec<Leaderboard>> {
        self.query_snapshots(
            "SELECT body FROM leaderboard_snapshots WHERE event_id = ?1 ORDER BY calculated_at, id",
            event_id,
        )
    }

    fn snapshots_for_team(&self, team_id: &str) -> Result<Vec<Leaderboard>> {
        self.query_snapshots(
            "SELECT s.body FROM leaderboard_snapshots s
             JOIN snapshot_entries e ON e.snapshot_id = s.id
             WHERE e.team_id = ?1
             ORDER BY s.calculated_at, s.id",
            team_id,
        )
    }
}
