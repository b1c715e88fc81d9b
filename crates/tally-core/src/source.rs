//! Collaborator interfaces the engine reads from and writes snapshots to
//!
//! [`crate::db::Database`] implements every trait here; tests and embedders
//! can supply their own.

use crate::error::Result;
use crate::leaderboard::Leaderboard;
use crate::roster::{Event, Submission, Team};
use crate::rubric::ScoringRubric;
use crate::score::{ScoreRecord, SubmissionScores};

/// Everything needed to rank one event, read at a single point in time
#[derive(Debug, Clone, PartialEq)]
pub struct EventSnapshot {
    pub event: Event,
    pub rubric: ScoringRubric,
    /// Participating teams, sorted by id
    pub teams: Vec<Team>,
    /// Submissions with their judge records, sorted by submission id
    pub submissions: Vec<SubmissionScores>,
}

/// Read access to judge score records
pub trait ScoreRecordSource {
    fn event(&self, event_id: &str) -> Result<Event>;
    /// Point-in-time read of an event, its rubric, teams and records
    fn event_snapshot(&self, event_id: &str) -> Result<EventSnapshot>;
    fn records_for_submission(&self, submission_id: &str) -> Result<Vec<ScoreRecord>>;
}

pub trait RubricSource {
    /// Latest version
    fn rubric(&self, rubric_id: &str) -> Result<ScoringRubric>;
    fn rubric_version(&self, rubric_id: &str, version: u32) -> Result<ScoringRubric>;
    /// Stored rubrics with template scope, followed by built-in templates
    /// whose ids are not shadowed by a stored one
    fn templates(&self) -> Result<Vec<ScoringRubric>>;

    /// The rubric version an event was pinned to when it was created
    fn event_rubric(&self, event: &Event) -> Result<ScoringRubric> {
        self.rubric_version(&event.rubric_id, event.rubric_version)
    }
}

pub trait TeamDirectory {
    fn team(&self, team_id: &str) -> Result<Team>;
    fn submission(&self, submission_id: &str) -> Result<Submission>;
    fn submissions_for_team(&self, team_id: &str) -> Result<Vec<Submission>>;
}

/// Persisted leaderboard snapshots, oldest first
pub trait SnapshotStore {
    fn save_snapshot(&self, leaderboard: &Leaderboard) -> Result<()>;
    fn snapshots_for_event(&self, event_id: &str) -> Result<Vec<Leaderboard>>;
    fn snapshots_for_team(&self, team_id: &str) -> Result<Vec<Leaderboard>>;
}
