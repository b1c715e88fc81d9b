//! Pipelines that pull from the collaborator sources and run the engine
//!
//! Each function reads what it needs, then aggregates, ranks or derives
//! history from that point-in-time view. Only `now` comes from the caller.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::aggregate::{aggregate, judging_progress, AggregatedScore, JudgingProgress};
use crate::error::Result;
use crate::history::{PositionHistory, ScoreHistory, ScoreHistoryEntry};
use crate::leaderboard::{rank_leaderboard, Leaderboard, RankingOptions, TeamScores};
use crate::source::{
    EventSnapshot, RubricSource, ScoreRecordSource, SnapshotStore, TeamDirectory,
};

impl EventSnapshot {
    /// Aggregate every submission in the snapshot, in submission id order
    pub fn aggregated(&self) -> Result<Vec<(String, AggregatedScore)>> {
        let mut out = Vec::with_capacity(self.submissions.len());
        for submission in &self.submissions {
            let score = aggregate(&self.rubric, &submission.submission_id, &submission.records)?;
            out.push((submission.team_id.clone(), score));
        }
        Ok(out)
    }

    /// Ranker input: every participating team with its aggregated submissions
    pub fn team_scores(&self) -> Result<Vec<TeamScores>> {
        let mut by_team: BTreeMap<String, TeamScores> = self
            .teams
            .iter()
            .map(|team| {
                (
                    team.id.clone(),
                    TeamScores {
                        team_id: team.id.clone(),
                        team_name: team.name.clone(),
                        scores: Vec::new(),
                    },
                )
            })
            .collect();

        for (team_id, score) in self.aggregated()? {
            by_team
                .entry(team_id.clone())
                .or_insert_with(|| TeamScores {
                    team_id: team_id.clone(),
                    team_name: team_id,
                    scores: Vec::new(),
                })
                .scores
                .push(score);
        }

        Ok(by_team.into_values().collect())
    }
}

/// Recompute an event's leaderboard from a single consistent read
#[tracing::instrument(skip(source, options), fields(sort = %options.sort_field))]
pub fn compute_event_leaderboard<S>(
    source: &S,
    event_id: &str,
    options: &RankingOptions,
    now: DateTime<Utc>,
) -> Result<Leaderboard>
where
    S: ScoreRecordSource + ?Sized,
{
    let start = Instant::now();
    let snapshot = source.event_snapshot(event_id)?;
    let teams = snapshot.team_scores()?;
    crate::trace_time!(
        start,
        "event_snapshot_aggregated",
        submissions = snapshot.submissions.len()
    );

    Ok(rank_leaderboard(event_id, &teams, options, now)?)
}

/// Aggregate one submission with its event's rubric
pub fn aggregate_submission<S>(source: &S, submission_id: &str) -> Result<AggregatedScore>
where
    S: ScoreRecordSource + RubricSource + TeamDirectory + ?Sized,
{
    let submission = source.submission(submission_id)?;
    let event = source.event(&submission.event_id)?;
    let rubric = source.event_rubric(&event)?;
    let records = source.records_for_submission(submission_id)?;
    Ok(aggregate(&rubric, submission_id, &records)?)
}

pub fn event_progress<S>(source: &S, event_id: &str) -> Result<JudgingProgress>
where
    S: ScoreRecordSource + ?Sized,
{
    let snapshot = source.event_snapshot(event_id)?;
    Ok(judging_progress(
        &snapshot.rubric,
        event_id,
        &snapshot.submissions,
    )?)
}

/// Score history of a team across events, optionally limited to one event.
///
/// Each entry is the aggregated total of one submission, stamped with its
/// submission time.
#[tracing::instrument(skip(source))]
pub fn team_score_history<S>(
    source: &S,
    team_id: &str,
    event_id: Option<&str>,
) -> Result<ScoreHistory>
where
    S: ScoreRecordSource + TeamDirectory + ?Sized,
{
    source.team(team_id)?;
    let events: BTreeSet<String> = source
        .submissions_for_team(team_id)?
        .into_iter()
        .map(|s| s.event_id)
        .filter(|id| event_id.is_none_or(|wanted| id.as_str() == wanted))
        .collect();

    let mut entries = Vec::new();
    for event in &events {
        let snapshot = source.event_snapshot(event)?;
        for submission in snapshot.submissions.iter().filter(|s| s.team_id == team_id) {
            let score = aggregate(
                &snapshot.rubric,
                &submission.submission_id,
                &submission.records,
            )?;
            entries.push(ScoreHistoryEntry::new(
                submission.submission_id.clone(),
                event.clone(),
                score.total_score,
                submission.submitted_at,
            ));
        }
    }

    debug!(
        team_id,
        events = events.len(),
        entries = entries.len(),
        "derived score history"
    );
    Ok(ScoreHistory::derive(entries))
}

/// Position history of a team from persisted snapshots
pub fn team_position_history<S>(
    source: &S,
    team_id: &str,
    event_id: Option<&str>,
) -> Result<PositionHistory>
where
    S: SnapshotStore + TeamDirectory + ?Sized,
{
    source.team(team_id)?;
    let snapshots = source.snapshots_for_team(team_id)?;
    Ok(PositionHistory::from_snapshots(
        team_id,
        snapshots
            .iter()
            .filter(|s| event_id.is_none_or(|wanted| wanted == s.event_id)),
    ))
}
