//! Leaderboard snapshots
//!
//! [`Leaderboard::new`] checks that team ids are unique, positions run
//! exactly `1..=N` and every score is finite and in range. The fields stay
//! public for serde and callers; a snapshot built or edited by hand is only
//! trusted after [`Leaderboard::validate`], which the store runs on every
//! save and load.

mod diff;
mod options;
mod rank;

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::aggregate::AggregatedScore;
use crate::error::ValidationError;

pub use diff::{LeaderboardDiff, TeamMovement};
pub use options::{RankingOptions, SortDirection, SortField, TeamScorePolicy};
pub use rank::rank_leaderboard;

/// Ranker input: a team and its aggregated submissions (possibly none)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScores {
    pub team_id: String,
    pub team_name: String,
    pub scores: Vec<AggregatedScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub team_id: String,
    pub team_name: String,
    pub total_score: f64,
    pub average_score: f64,
    pub submission_count: usize,
    /// 1-based, unique within the leaderboard
    pub position: u32,
    /// Criterion key → mean normalized score across the team's submissions
    pub per_criterion_scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardMetadata {
    /// Teams handed to the ranker
    pub teams_considered: usize,
    /// Teams left after filtering, before top-N truncation
    pub teams_ranked: usize,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub team_score: TeamScorePolicy,
    pub exclude_incomplete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    /// SHA-256 over the ordered entries; equal digests mean equal rankings
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub event_id: String,
    pub entries: Vec<LeaderboardEntry>,
    pub calculated_at: DateTime<Utc>,
    pub metadata: LeaderboardMetadata,
}

impl Leaderboard {
    /// Build a validated snapshot; the digest in `metadata` is recomputed
    pub fn new(
        event_id: impl Into<String>,
        entries: Vec<LeaderboardEntry>,
        calculated_at: DateTime<Utc>,
        mut metadata: LeaderboardMetadata,
    ) -> Result<Self, ValidationError> {
        validate_entries(&entries, metadata.team_score)?;
        metadata.digest = digest(&entries);
        Ok(Self {
            event_id: event_id.into(),
            entries,
            calculated_at,
            metadata,
        })
    }

    /// Re-check the snapshot invariants (e.g. after deserializing one)
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_entries(&self.entries, self.metadata.team_score)
    }

    pub fn entry(&self, team_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.team_id == team_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const MAX_SCORE: f64 = 100.0;

/// Scores live on `[0, 100]`; only a summed team total may go higher
fn check_score(team_id: &str, score: f64, max: f64) -> Result<(), ValidationError> {
    if score.is_finite() && score < 0.0 {
        return Err(ValidationError::NegativeScore {
            team_id: team_id.to_string(),
            score,
        });
    }
    if !score.is_finite() || score > max {
        return Err(ValidationError::ScoreOutOfRange {
            team_id: team_id.to_string(),
            score,
            max,
        });
    }
    Ok(())
}

fn validate_entries(
    entries: &[LeaderboardEntry],
    team_score: TeamScorePolicy,
) -> Result<(), ValidationError> {
    let total_max = match team_score {
        TeamScorePolicy::Sum => f64::MAX,
        TeamScorePolicy::Highest | TeamScorePolicy::Average => MAX_SCORE,
    };
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        if !seen.insert(entry.team_id.as_str()) {
            return Err(ValidationError::DuplicateTeam {
                team_id: entry.team_id.clone(),
            });
        }

        let expected = (index + 1) as u32;
        if entry.position != expected {
            return Err(ValidationError::NonContiguousPositions {
                expected,
                found: entry.position,
            });
        }

        check_score(&entry.team_id, entry.total_score, total_max)?;
        check_score(&entry.team_id, entry.average_score, MAX_SCORE)?;
        for score in entry.per_criterion_scores.values() {
            check_score(&entry.team_id, *score, MAX_SCORE)?;
        }
    }
    Ok(())
}

fn digest(entries: &[LeaderboardEntry]) -> String {
    let mut hasher = Sha256::new();
    for entry in entries {
        hasher.update(
            format!(
                "{}\t{}\t{:016x}\t{:016x}\t{}\n",
                entry.position,
                entry.team_id,
                entry.total_score.to_bits(),
                entry.average_score.to_bits(),
                entry.submission_count
            )
            .as_bytes(),
        );
    }
    let hash = hasher.finalize();
    hex::encode(&hash[..])
}
