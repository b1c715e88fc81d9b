use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::roster::{event_submissions, event_teams, load_event};
use super::rubrics::resolve_rubric_version;
use super::{parse_json, parse_timestamp, Database};
use crate::aggregate::aggregate;
use crate::error::{Result, TallyError};
use crate::rubric::ScoreValue;
use crate::score::{ScoreRecord, SubmissionScores};
use crate::source::{EventSnapshot, ScoreRecordSource, TeamDirectory};

const RECORD_COLUMNS: &str =
    "submission_id, judge_id, event_id, values_json, comment, total, created_at, updated_at";

fn record_from_row(row: &Row) -> rusqlite::Result<ScoreRecord> {
    let values_json: String = row.get(3)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;
    Ok(ScoreRecord {
        submission_id: row.get(0)?,
        judge_id: row.get(1)?,
        event_id: row.get(2)?,
        values: parse_json(3, &values_json)?,
        comment: row.get(4)?,
        total: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
        updated_at: parse_timestamp(7, &updated_at)?,
    })
}

fn load_records(conn: &Connection, sql_filter: &str, key: &str) -> Result<Vec<ScoreRecord>> {
    let sql = format!(
        "SELECT {} FROM score_records WHERE {} = ?1 ORDER BY submission_id, judge_id",
        RECORD_COLUMNS, sql_filter
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| crate::map_db_err!("prepare query", e))?;
    let rows = stmt
        .query_map(params![key], record_from_row)
        .map_err(|e| crate::map_db_err!("list score records", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| crate::map_db_err!("read score record", e))
}

impl Database {
    pub fn score_record(&self, submission_id: &str, judge_id: &str) -> Result<Option<ScoreRecord>> {
        let sql = format!(
            "SELECT {} FROM score_records WHERE submission_id = ?1 AND judge_id = ?2",
            RECORD_COLUMNS
        );
        self.conn
            .query_row(&sql, params![submission_id, judge_id], record_from_row)
            .optional()
            .map_err(|e| crate::map_db_err!("load score record", e))
    }

    /// Replace one judge's record for a submission.
    ///
    /// The new values are validated against the event's rubric and written as
    /// a whole row; the previous record's creation time is kept. The cached
    /// `total` is the single-judge aggregate of the new values.
    #[tracing::instrument(skip(self, values, comment, now))]
    pub fn set_scores(
        &self,
        submission_id: &str,
        judge_id: &str,
        values: BTreeMap<String, ScoreValue>,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ScoreRecord> {
        if judge_id.trim().is_empty() {
            crate::bail_invalid!("judge id", "<empty>");
        }
        let submission = self.submission(submission_id)?;
        let event = load_event(&self.conn, &submission.event_id)?;
        let rubric =
            resolve_rubric_version(&self.conn, &event.rubric_id, event.rubric_version)?;

        let mut record = match self.score_record(submission_id, judge_id)? {
            Some(existing) => existing.replaced(values, comment, now),
            None => {
                let mut fresh = ScoreRecord::new(submission_id, judge_id, &event.id, now);
                fresh.values = values;
                fresh.comment = comment;
                fresh
            }
        };
        record.validate_against(&rubric)?;
        record.total =
            Some(aggregate(&rubric, submission_id, std::slice::from_ref(&record))?.total_score);

        let values_json = serde_json::to_string(&record.values)?;
        self.conn
            .execute(
                "INSERT INTO score_records (submission_id, judge_id, event_id, values_json, comment, total, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(submission_id, judge_id) DO UPDATE SET
                    event_id = excluded.event_id,
                    values_json = excluded.values_json,
                    comment = excluded.comment,
                    total = excluded.total,
                    updated_at = excluded.updated_at",
                params![
                    record.submission_id,
                    record.judge_id,
                    record.event_id,
                    values_json,
                    record.comment,
                    record.total,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| crate::map_db_err!("store score record", e))?;

        tracing::debug!(
            criteria = record.values.len(),
            total = ?record.total,
            "stored score record"
        );
        Ok(record)
    }
}

impl ScoreRecordSource for Database {
    fn event(&self, event_id: &str) -> Result<crate::roster::Event> {
        load_event(&self.conn, event_id)
    }

    /// All reads happen inside one transaction, so a judge's concurrent write
    /// is either fully visible or not at all.
    fn event_snapshot(&self, event_id: &str) -> Result<EventSnapshot> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| TallyError::Other(format!("failed to start transaction: {}", e)))?;

        let event = load_event(&tx, event_id)?;
        let rubric = resolve_rubric_version(&tx, &event.rubric_id, event.rubric_version)?;
        let teams = event_teams(&tx, event_id)?;
        let submissions = event_submissions(&tx, event_id)?;
        let records = load_records(&tx, "event_id", event_id)?;

        tx.commit()
            .map_err(|e| TallyError::Other(format!("failed to commit transaction: {}", e)))?;

        let mut by_submission: BTreeMap<String, Vec<ScoreRecord>> = BTreeMap::new();
        for record in records {
            by_submission
                .entry(record.submission_id.clone())
                .or_default()
                .push(record);
        }

        let submissions = submissions
            .into_iter()
            .map(|s| SubmissionScores {
                records: by_submission.remove(&s.id).unwrap_or_default(),
                submission_id: s.id,
                team_id: s.team_id,
                submitted_at: s.submitted_at,
            })
            .collect();

        Ok(EventSnapshot {
            event,
            rubric,
            teams,
            submissions,
        })
    }

    fn records_for_submission(&self, submission_id: &str) -> Result<Vec<ScoreRecord>> {
        load_records(&self.conn, "submission_id", submission_id)
    }
}
