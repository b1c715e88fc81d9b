//! Team grouping, ordering and position assignment

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{
    Leaderboard, LeaderboardEntry, LeaderboardMetadata, RankingOptions, SortDirection, SortField,
    TeamScorePolicy, TeamScores,
};
use crate::aggregate::AggregatedScore;
use crate::error::ValidationError;

/// Scores are compared at this resolution so float noise cannot split a tie
const SCORE_QUANTUM: f64 = 1e6;

fn quantize(score: f64) -> i64 {
    (score * SCORE_QUANTUM).round() as i64
}

/// Per-team statistics before positions are assigned
struct TeamSummary<'a> {
    team_id: &'a str,
    team_name: &'a str,
    total_score: f64,
    average_score: f64,
    submission_count: usize,
    per_criterion_scores: BTreeMap<String, f64>,
}

impl TeamSummary<'_> {
    fn ranking_score(&self, field: SortField) -> f64 {
        match field {
            SortField::TotalScore => self.total_score,
            _ => self.average_score,
        }
    }
}

fn summarize<'a>(
    team: &'a TeamScores,
    options: &RankingOptions,
) -> TeamSummary<'a> {
    let mut scores: Vec<&AggregatedScore> = team
        .scores
        .iter()
        .filter(|s| !options.exclude_incomplete || s.is_complete)
        .collect();
    scores.sort_by(|a, b| a.submission_id.cmp(&b.submission_id));

    let submission_count = scores.len();
    let sum: f64 = scores.iter().map(|s| s.total_score).sum();
    let average_score = if submission_count == 0 {
        0.0
    } else {
        sum / submission_count as f64
    };
    let total_score = match options.team_score {
        TeamScorePolicy::Highest => scores
            .iter()
            .map(|s| s.total_score)
            .fold(0.0, f64::max),
        TeamScorePolicy::Sum => sum,
        TeamScorePolicy::Average => average_score,
    };

    let mut criterion_sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for score in &scores {
        for (key, average) in &score.per_criterion_averages {
            let slot = criterion_sums.entry(key.as_str()).or_insert((0.0, 0));
            slot.0 += average.normalized;
            slot.1 += 1;
        }
    }
    let per_criterion_scores = criterion_sums
        .into_iter()
        .map(|(key, (sum, n))| (key.to_string(), sum / n as f64))
        .collect();

    TeamSummary {
        team_id: &team.team_id,
        team_name: &team.team_name,
        total_score,
        average_score,
        submission_count,
        per_criterion_scores,
    }
}

fn passes_filters(summary: &TeamSummary, options: &RankingOptions) -> bool {
    if let Some(min_score) = options.min_score {
        if summary.ranking_score(options.sort_field) < min_score {
            return false;
        }
    }
    if let Some(min_submissions) = options.min_submissions {
        if summary.submission_count < min_submissions {
            return false;
        }
    }
    if let Some(teams) = &options.teams {
        if !teams.contains(summary.team_id) {
            return false;
        }
    }
    true
}

/// Total order: the sort field in the requested direction, then more
/// submissions first, then the smaller team id.
fn compare(a: &TeamSummary, b: &TeamSummary, options: &RankingOptions) -> Ordering {
    let primary = match options.sort_field {
        SortField::AverageScore | SortField::TotalScore => {
            let field = options.sort_field;
            quantize(a.ranking_score(field)).cmp(&quantize(b.ranking_score(field)))
        }
        SortField::SubmissionCount => a.submission_count.cmp(&b.submission_count),
        SortField::TeamName => a.team_name.cmp(b.team_name),
    };
    let primary = match options.direction {
        SortDirection::Descending => primary.reverse(),
        SortDirection::Ascending => primary,
    };

    primary
        .then_with(|| b.submission_count.cmp(&a.submission_count))
        .then_with(|| a.team_id.cmp(b.team_id))
}

/// Rank teams into a validated leaderboard snapshot.
///
/// Filtering and sorting only decide which entries appear and in what
/// order; the aggregated scores themselves are never changed.
pub fn rank_leaderboard(
    event_id: &str,
    teams: &[TeamScores],
    options: &RankingOptions,
    calculated_at: DateTime<Utc>,
) -> Result<Leaderboard, ValidationError> {
    let start = Instant::now();

    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team.team_id.as_str()) {
            return Err(ValidationError::DuplicateTeam {
                team_id: team.team_id.clone(),
            });
        }
    }

    let mut summaries: Vec<TeamSummary> = teams
        .iter()
        .map(|team| summarize(team, options))
        .filter(|summary| passes_filters(summary, options))
        .collect();
    summaries.sort_by(|a, b| compare(a, b, options));
    let teams_ranked = summaries.len();

    let keep = options.top.unwrap_or(teams_ranked);
    let entries: Vec<LeaderboardEntry> = summaries
        .into_iter()
        .take(keep)
        .enumerate()
        .map(|(index, summary)| LeaderboardEntry {
            team_id: summary.team_id.to_string(),
            team_name: summary.team_name.to_string(),
            total_score: summary.total_score,
            average_score: summary.average_score,
            submission_count: summary.submission_count,
            position: (index + 1) as u32,
            per_criterion_scores: summary.per_criterion_scores,
        })
        .collect();

    let metadata = LeaderboardMetadata {
        teams_considered: teams.len(),
        teams_ranked,
        sort_field: options.sort_field,
        sort_direction: options.direction,
        team_score: options.team_score,
        exclude_incomplete: options.exclude_incomplete,
        top: options.top,
        digest: String::new(),
    };

    let leaderboard = Leaderboard::new(event_id, entries, calculated_at, metadata)?;

    crate::trace_time!(start, "rank_leaderboard", teams = teams.len());
    debug!(
        event_id,
        teams_considered = teams.len(),
        teams_ranked,
        shown = leaderboard.len(),
        "ranked leaderboard"
    );

    Ok(leaderboard)
}
