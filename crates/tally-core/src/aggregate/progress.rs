//! Judging progress for an event

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::aggregate;
use crate::error::ValidationError;
use crate::rubric::ScoringRubric;
use crate::score::SubmissionScores;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionProgress {
    pub submission_id: String,
    pub team_id: String,
    /// Judges with a record for this submission, sorted
    pub judges: Vec<String>,
    /// Judges seen elsewhere in the event without a record here, sorted
    pub missing_judges: Vec<String>,
    pub completion_percentage: f64,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgingProgress {
    pub event_id: String,
    /// Every judge with at least one record in the event, sorted
    pub judges: Vec<String>,
    pub submissions: Vec<SubmissionProgress>,
    pub complete_submissions: usize,
}

impl JudgingProgress {
    /// Share of submissions that are complete, as a percentage
    pub fn completion_rate(&self) -> f64 {
        if self.submissions.is_empty() {
            0.0
        } else {
            self.complete_submissions as f64 / self.submissions.len() as f64 * 100.0
        }
    }
}

/// Summarize who has scored what, submission by submission
pub fn judging_progress(
    rubric: &ScoringRubric,
    event_id: &str,
    submissions: &[SubmissionScores],
) -> Result<JudgingProgress, ValidationError> {
    let all_judges: BTreeSet<&str> = submissions
        .iter()
        .flat_map(|s| s.records.iter().map(|r| r.judge_id.as_str()))
        .collect();

    let mut ordered: Vec<&SubmissionScores> = submissions.iter().collect();
    ordered.sort_by(|a, b| a.submission_id.cmp(&b.submission_id));

    let mut rows = Vec::with_capacity(ordered.len());
    for submission in ordered {
        let aggregated = aggregate(rubric, &submission.submission_id, &submission.records)?;

        let judges: BTreeSet<&str> = submission
            .records
            .iter()
            .map(|r| r.judge_id.as_str())
            .collect();
        let missing_judges = all_judges
            .difference(&judges)
            .map(|j| j.to_string())
            .collect();

        rows.push(SubmissionProgress {
            submission_id: submission.submission_id.clone(),
            team_id: submission.team_id.clone(),
            judges: judges.into_iter().map(str::to_string).collect(),
            missing_judges,
            completion_percentage: aggregated.completion_percentage,
            is_complete: aggregated.is_complete,
        });
    }

    let complete_submissions = rows.iter().filter(|r| r.is_complete).count();
    Ok(JudgingProgress {
        event_id: event_id.to_string(),
        judges: all_judges.into_iter().map(str::to_string).collect(),
        submissions: rows,
        complete_submissions,
    })
}
