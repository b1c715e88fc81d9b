use rusqlite::{params, Connection, OptionalExtension, Row};

use super::rubrics::resolve_rubric_version;
use super::{parse_timestamp, Database};
use crate::error::{Result, TallyError};
use crate::roster::{Event, Submission, Team};
use crate::source::TeamDirectory;

const EVENT_COLUMNS: &str = "id, name, rubric_id, rubric_version, created_at";

fn event_from_row(row: &Row) -> rusqlite::Result<Event> {
    let created_at: String = row.get(4)?;
    Ok(Event {
        id: row.get(0)?,
        name: row.get(1)?,
        rubric_id: row.get(2)?,
        rubric_version: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

fn team_from_row(row: &Row) -> rusqlite::Result<Team> {
    let created_at: String = row.get(2)?;
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_timestamp(2, &created_at)?,
    })
}

fn submission_from_row(row: &Row) -> rusqlite::Result<Submission> {
    let submitted_at: String = row.get(3)?;
    Ok(Submission {
        id: row.get(0)?,
        team_id: row.get(1)?,
        event_id: row.get(2)?,
        submitted_at: parse_timestamp(3, &submitted_at)?,
    })
}

pub(super) fn load_event(conn: &Connection, event_id: &str) -> Result<Event> {
    conn.query_row(
        &format!("SELECT {} FROM events WHERE id = ?1", EVENT_COLUMNS),
        params![event_id],
        event_from_row,
    )
    .optional()
    .map_err(|e| crate::map_db_err!("load event", e))?
    .ok_or_else(|| TallyError::not_found("event", event_id))
}

fn load_team(conn: &Connection, team_id: &str) -> Result<Option<Team>> {
    conn.query_row(
        "SELECT id, name, created_at FROM teams WHERE id = ?1",
        params![team_id],
        team_from_row,
    )
    .optional()
    .map_err(|e| crate::map_db_err!("load team", e))
}

/// Teams registered for an event, sorted by id
pub(super) fn event_teams(conn: &Connection, event_id: &str) -> Result<Vec<Team>> {
    let mut stmt = conn
        .prepare(
            "SELECT t.id, t.name, t.created_at FROM teams t
             JOIN event_teams et ON et.team_id = t.id
             WHERE et.event_id = ?1
             ORDER BY t.id",
        )
        .map_err(|e| crate::map_db_err!("prepare query", e))?;
    let rows = stmt
        .query_map(params![event_id], team_from_row)
        .map_err(|e| crate::map_db_err!("list event teams", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| crate::map_db_err!("read team", e))
}

pub(super) fn event_submissions(conn: &Connection, event_id: &str) -> Result<Vec<Submission>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, team_id, event_id, submitted_at FROM submissions
             WHERE event_id = ?1 ORDER BY id",
        )
        .map_err(|e| crate::map_db_err!("prepare query", e))?;
    let rows = stmt
        .query_map(params![event_id], submission_from_row)
        .map_err(|e| crate::map_db_err!("list submissions", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| crate::map_db_err!("read submission", e))
}

impl Database {
    /// Register an event; its pinned rubric version must exist (stored or
    /// built-in)
    pub fn insert_event(&self, event: &Event) -> Result<()> {
        resolve_rubric_version(&self.conn, &event.rubric_id, event.rubric_version)?;
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO events (id, name, rubric_id, rubric_version, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.id,
                    event.name,
                    event.rubric_id,
                    event.rubric_version,
                    event.created_at.to_rfc3339()
                ],
            )
            .map_err(|e| crate::map_db_err!("insert event", e))?;
        if inserted == 0 {
            return Err(TallyError::already_exists("event", &event.id));
        }
        Ok(())
    }

    pub fn list_events(&self) -> Result<Vec<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM events ORDER BY id", EVENT_COLUMNS))
            .map_err(|e| crate::map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map([], event_from_row)
            .map_err(|e| crate::map_db_err!("list events", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| crate::map_db_err!("read event", e))
    }

    pub fn insert_team(&self, team: &Team) -> Result<()> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO teams (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![team.id, team.name, team.created_at.to_rfc3339()],
            )
            .map_err(|e| crate::map_db_err!("insert team", e))?;
        if inserted == 0 {
            return Err(TallyError::already_exists("team", &team.id));
        }
        Ok(())
    }

    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM teams ORDER BY id")
            .map_err(|e| crate::map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map([], team_from_row)
            .map_err(|e| crate::map_db_err!("list teams", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| crate::map_db_err!("read team", e))
    }

    /// Enter a team into an event; entering twice is a no-op
    pub fn add_participant(&self, event_id: &str, team_id: &str) -> Result<()> {
        load_event(&self.conn, event_id)?;
        self.team(team_id)?;
        self.conn
            .execute(
                "INSERT OR IGNORE INTO event_teams (event_id, team_id) VALUES (?1, ?2)",
                params![event_id, team_id],
            )
            .map_err(|e| crate::map_db_err!("add participant", e))?;
        Ok(())
    }

    /// Record a submission and enter its team into the event
    pub fn insert_submission(&self, submission: &Submission) -> Result<()> {
        self.add_participant(&submission.event_id, &submission.team_id)?;
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO submissions (id, team_id, event_id, submitted_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    submission.id,
                    submission.team_id,
                    submission.event_id,
                    submission.submitted_at.to_rfc3339()
                ],
            )
            .map_err(|e| crate::map_db_err!("insert submission", e))?;
        if inserted == 0 {
            return Err(TallyError::already_exists("submission", &submission.id));
        }
        tracing::debug!(
            submission_id = %submission.id,
            team_id = %submission.team_id,
            event_id = %submission.event_id,
            "recorded submission"
        );
        Ok(())
    }
}

impl TeamDirectory for Database {
    fn team(&self, team_id: &str) -> Result<Team> {
        load_team(&self.conn, team_id)?.ok_or_else(|| TallyError::not_found("team", team_id))
    }

    fn submission(&self, submission_id: &str) -> Result<Submission> {
        self.conn
            .query_row(
                "SELECT id, team_id, event_id, submitted_at FROM submissions WHERE id = ?1",
                params![submission_id],
                submission_from_row,
            )
            .optional()
            .map_err(|e| crate::map_db_err!("load submission", e))?
            .ok_or_else(|| TallyError::not_found("submission", submission_id))
    }

    fn submissions_for_team(&self, team_id: &str) -> Result<Vec<Submission>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, team_id, event_id, submitted_at FROM submissions
                 WHERE team_id = ?1 ORDER BY submitted_at, id",
            )
            .map_err(|e| crate::map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map(params![team_id], submission_from_row)
            .map_err(|e| crate::map_db_err!("list team submissions", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| crate::map_db_err!("read submission", e))
    }
}
