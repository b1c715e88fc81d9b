//! Line formats for `--format records`
//!
//! Every output starts with an `H` header line; each following line starts
//! with a one-letter kind: `E` leaderboard entry, `A` aggregate, `C` criterion
//! average, `P` position, `T` trend, `D` history point, `R` rubric, `K` rubric
//! criterion, `S` score record, `J` judging progress, `V` event, `M` team.

use crate::aggregate::{AggregatedScore, SubmissionProgress};
use crate::format::format_score;
use crate::history::{PositionEntry, ScoreHistoryEntry, ScoreTrend};
use crate::leaderboard::LeaderboardEntry;
use crate::roster::{Event, Team};
use crate::rubric::{ScoringCriterion, ScoringRubric};
use crate::score::ScoreRecord;

/// Escape double quotes in a string for records format.
pub fn escape_quotes(s: &str) -> String {
    s.replace('\"', r#"\""#)
}

/// Header line: `H tally=1 records=1 mode=<mode> <extra>`
pub fn format_header(mode: &str, extra: &str) -> String {
    if extra.is_empty() {
        format!("H tally=1 records=1 mode={}", mode)
    } else {
        format!("H tally=1 records=1 mode={} {}", mode, extra)
    }
}

pub fn format_entry_record(entry: &LeaderboardEntry, precision: usize) -> String {
    format!(
        "E {} {} \"{}\" total={} average={} submissions={}",
        entry.position,
        entry.team_id,
        escape_quotes(&entry.team_name),
        format_score(entry.total_score, precision),
        format_score(entry.average_score, precision),
        entry.submission_count
    )
}

/// One `A` line followed by a `C` line per scored criterion
pub fn format_aggregate_records(score: &AggregatedScore, precision: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "A {} total={} completion={} complete={} judges={}",
        score.submission_id,
        format_score(score.total_score, precision),
        format_score(score.completion_percentage, precision),
        score.is_complete,
        score.contributing_judge_count
    )];
    for (key, average) in &score.per_criterion_averages {
        lines.push(format!(
            "C {} {} average={} normalized={} judges={}",
            score.submission_id,
            key,
            format_score(average.average, precision),
            format_score(average.normalized, precision),
            average.contributing_judges
        ));
    }
    lines
}

pub fn format_position_record(entry: &PositionEntry, precision: usize) -> String {
    format!(
        "P {} position={} of={} score={} at={}",
        entry.event_id,
        entry.position,
        entry.total_teams,
        format_score(entry.score, precision),
        entry.timestamp.to_rfc3339()
    )
}

pub fn format_trend_record(team_id: &str, trend: &ScoreTrend, precision: usize) -> String {
    let optional = |score: Option<f64>| {
        score
            .map(|s| format_score(s, precision))
            .unwrap_or_else(|| "-".to_string())
    };
    format!(
        "T {} direction={} magnitude={} first={} last={} change={} points={}",
        team_id,
        trend.direction,
        format_score(trend.magnitude, precision),
        optional(trend.first_score),
        optional(trend.last_score),
        format_score(trend.change, precision),
        trend.points
    )
}

pub fn format_history_record(entry: &ScoreHistoryEntry, precision: usize) -> String {
    format!(
        "D {} event={} score={} at={}",
        entry.submission_id,
        entry.event_id,
        format_score(entry.score, precision),
        entry.timestamp.to_rfc3339()
    )
}

pub fn format_rubric_record(rubric: &ScoringRubric) -> String {
    format!(
        "R {} version={} scope={} criteria={} \"{}\"",
        rubric.id,
        rubric.version,
        rubric.scope,
        rubric.criteria.len(),
        escape_quotes(&rubric.name)
    )
}

pub fn format_criterion_record(rubric_id: &str, criterion: &ScoringCriterion) -> String {
    format!(
        "K {} {} type={} max={} weight={} required={} \"{}\"",
        rubric_id,
        criterion.key,
        criterion.criterion_type,
        criterion.max_score,
        criterion.weight,
        criterion.required,
        escape_quotes(&criterion.name)
    )
}

/// `S` line; values are rendered `key=value` in key order
pub fn format_score_record(record: &ScoreRecord, precision: usize) -> String {
    let mut line = format!("S {} {}", record.submission_id, record.judge_id);
    if let Some(total) = record.total {
        line.push_str(&format!(" total={}", format_score(total, precision)));
    }
    for (key, value) in &record.values {
        line.push_str(&format!(" {}={}", key, value));
    }
    line
}

pub fn format_progress_record(progress: &SubmissionProgress, precision: usize) -> String {
    format!(
        "J {} team={} judges={} completion={} complete={}",
        progress.submission_id,
        progress.team_id,
        progress.judges.len(),
        format_score(progress.completion_percentage, precision),
        progress.is_complete
    )
}

pub fn format_event_record(event: &Event) -> String {
    format!(
        "V {} rubric={} version={} created={} \"{}\"",
        event.id,
        event.rubric_id,
        event.rubric_version,
        event.created_at.to_rfc3339(),
        escape_quotes(&event.name)
    )
}

pub fn format_team_record(team: &Team) -> String {
    format!("M {} \"{}\"", team.id, escape_quotes(&team.name))
}
