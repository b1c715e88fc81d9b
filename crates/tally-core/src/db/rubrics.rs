use rusqlite::{params, Connection, OptionalExtension};

use super::{parse_json, Database};
use crate::error::{Result, TallyError};
use crate::rubric::{templates, RubricScope, ScoringRubric};
use crate::source::RubricSource;

fn query_rubric(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
) -> Result<Option<ScoringRubric>> {
    conn.query_row(sql, args, |row| {
        let body: String = row.get(0)?;
        parse_json(0, &body)
    })
    .optional()
    .map_err(|e| crate::map_db_err!("load rubric", e))
}

/// Latest stored version of a rubric
pub(super) fn load_rubric(conn: &Connection, rubric_id: &str) -> Result<Option<ScoringRubric>> {
    query_rubric(
        conn,
        "SELECT body FROM rubrics WHERE id = ?1 ORDER BY version DESC LIMIT 1",
        params![rubric_id],
    )
}

/// Stored rubric first, then a built-in template with that id
pub(super) fn resolve_rubric(conn: &Connection, rubric_id: &str) -> Result<ScoringRubric> {
    match load_rubric(conn, rubric_id)? {
        Some(rubric) => Ok(rubric),
        None => templates::find(rubric_id).ok_or_else(|| TallyError::not_found("rubric", rubric_id)),
    }
}

/// Exactly `version` of a rubric, stored or built-in
pub(super) fn resolve_rubric_version(
    conn: &Connection,
    rubric_id: &str,
    version: u32,
) -> Result<ScoringRubric> {
    let stored = query_rubric(
        conn,
        "SELECT body FROM rubrics WHERE id = ?1 AND version = ?2",
        params![rubric_id, version],
    )?;
    stored
        .or_else(|| templates::find(rubric_id).filter(|t| t.version == version))
        .ok_or_else(|| TallyError::not_found("rubric", format!("{} version {}", rubric_id, version)))
}

impl Database {
    /// Store a new rubric; it must be valid and its id unused
    pub fn insert_rubric(&self, rubric: &ScoringRubric) -> Result<()> {
        rubric.ensure_valid()?;
        if load_rubric(&self.conn, &rubric.id)?.is_some() {
            return Err(TallyError::already_exists("rubric", &rubric.id));
        }
        self.write_rubric(rubric)
    }

    /// Store a newer version of a rubric next to the existing ones.
    ///
    /// Events stay pinned to the version they were created with, so their
    /// recorded scores keep aggregating against the criteria they were given
    /// under.
    pub fn update_rubric(&self, rubric: &ScoringRubric) -> Result<()> {
        rubric.ensure_valid()?;
        let stored = load_rubric(&self.conn, &rubric.id)?
            .ok_or_else(|| TallyError::not_found("rubric", &rubric.id))?;
        if rubric.version <= stored.version {
            crate::bail_invalid!(
                "rubric version",
                format!(
                    "{} (stored version is {})",
                    rubric.version, stored.version
                )
            );
        }
        self.write_rubric(rubric)
    }

    fn write_rubric(&self, rubric: &ScoringRubric) -> Result<()> {
        let body = serde_json::to_string(rubric)?;
        self.conn
            .execute(
                "INSERT INTO rubrics (id, name, scope, version, body) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    rubric.id,
                    rubric.name,
                    rubric.scope.to_string(),
                    rubric.version,
                    body
                ],
            )
            .map_err(|e| crate::map_db_err!("store rubric", e))?;
        tracing::debug!(rubric_id = %rubric.id, version = rubric.version, "stored rubric");
        Ok(())
    }

    /// Latest version of every stored rubric
    pub fn list_rubrics(&self) -> Result<Vec<ScoringRubric>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT body FROM rubrics r
                 WHERE version = (SELECT MAX(version) FROM rubrics WHERE id = r.id)
                 ORDER BY id",
            )
            .map_err(|e| crate::map_db_err!("prepare query", e))?;
        let rows = stmt
            .query_map([], |row| {
                let body: String = row.get(0)?;
                parse_json::<ScoringRubric>(0, &body)
            })
            .map_err(|e| crate::map_db_err!("list rubrics", e))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| crate::map_db_err!("read rubric", e))
    }
}

impl RubricSource for Database {
    fn rubric(&self, rubric_id: &str) -> Result<ScoringRubric> {
        resolve_rubric(&self.conn, rubric_id)
    }

    fn rubric_version(&self, rubric_id: &str, version: u32) -> Result<ScoringRubric> {
        resolve_rubric_version(&self.conn, rubric_id, version)
    }

    fn templates(&self) -> Result<Vec<ScoringRubric>> {
        let mut out: Vec<ScoringRubric> = self
            .list_rubrics()?
            .into_iter()
            .filter(|r| r.scope == RubricScope::Template)
            .collect();
        for builtin in templates::builtin() {
            if !out.iter().any(|r| r.id == builtin.id) {
                out.push(builtin);
            }
        }
        Ok(out)
    }
}
