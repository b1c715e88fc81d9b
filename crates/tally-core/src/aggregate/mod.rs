//! Multi-judge score aggregation
//!
//! Normalization is completion-aware: the weighted total only divides by the
//! weight of criteria that at least one judge actually scored. A criterion no
//! judge addressed is left out rather than counted as zero, and the gap shows
//! up in `completion_percentage` / `is_complete` instead.

mod progress;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::rubric::ScoringRubric;
use crate::score::ScoreRecord;

pub use progress::{judging_progress, JudgingProgress, SubmissionProgress};

/// Average of the judges' values for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionAverage {
    /// Mean raw value in criterion units
    pub average: f64,
    /// `average` mapped onto 0–100
    pub normalized: f64,
    pub contributing_judges: usize,
}

/// Aggregated result for one submission.
///
/// Derived data: always recomputable from the rubric and the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedScore {
    pub submission_id: String,
    /// Weighted total on a 0–100 scale
    pub total_score: f64,
    pub completion_percentage: f64,
    /// Every required criterion has at least one response
    pub is_complete: bool,
    /// Only criteria with at least one response appear here
    pub per_criterion_averages: BTreeMap<String, CriterionAverage>,
    /// Judges that supplied at least one value
    pub contributing_judge_count: usize,
    pub rubric_id: String,
    pub rubric_version: u32,
}

impl AggregatedScore {
    /// Result for a submission nobody has scored
    fn empty(submission_id: &str, rubric: &ScoringRubric) -> Self {
        Self {
            submission_id: submission_id.to_string(),
            total_score: 0.0,
            completion_percentage: 0.0,
            is_complete: false,
            per_criterion_averages: BTreeMap::new(),
            contributing_judge_count: 0,
            rubric_id: rubric.id.clone(),
            rubric_version: rubric.version,
        }
    }
}

/// Order records by judge and reject anything that cannot be aggregated
fn checked_records<'a>(
    rubric: &ScoringRubric,
    submission_id: &str,
    records: &'a [ScoreRecord],
) -> Result<Vec<&'a ScoreRecord>, ValidationError> {
    let mut ordered: Vec<&ScoreRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.judge_id.cmp(&b.judge_id));

    for pair in ordered.windows(2) {
        if pair[0].judge_id == pair[1].judge_id {
            return Err(ValidationError::DuplicateJudge {
                submission_id: submission_id.to_string(),
                judge_id: pair[0].judge_id.clone(),
            });
        }
    }

    for record in &ordered {
        if record.submission_id != submission_id {
            return Err(ValidationError::MixedSubmissions {
                expected: submission_id.to_string(),
                found: record.submission_id.clone(),
            });
        }
        record.validate_against(rubric)?;
    }

    Ok(ordered)
}

/// Aggregate every judge's record for `submission_id` against `rubric`.
///
/// Calling this twice on the same inputs yields bit-identical output:
/// criteria are visited in declared rubric order and judges in id order,
/// whatever order `records` arrives in.
pub fn aggregate(
    rubric: &ScoringRubric,
    submission_id: &str,
    records: &[ScoreRecord],
) -> Result<AggregatedScore, ValidationError> {
    rubric.ensure_valid()?;
    let judges = checked_records(rubric, submission_id, records)?;

    let mut per_criterion = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut exercised_weight = 0.0;

    for criterion in &rubric.criteria {
        let mut sum = 0.0;
        let mut responses = 0usize;
        for record in &judges {
            if let Some(value) = record.values.get(&criterion.key) {
                sum += criterion.raw_value(value);
                responses += 1;
            }
        }
        if responses == 0 {
            continue;
        }

        let average = sum / responses as f64;
        let normalized = criterion.normalize(average);
        weighted_sum += normalized * criterion.weight;
        exercised_weight += criterion.weight;

        per_criterion.insert(
            criterion.key.clone(),
            CriterionAverage {
                average,
                normalized,
                contributing_judges: responses,
            },
        );
    }

    if per_criterion.is_empty() {
        debug!(submission_id, judges = judges.len(), "no responses to aggregate");
        return Ok(AggregatedScore::empty(submission_id, rubric));
    }

    let total_score = (weighted_sum / exercised_weight).clamp(0.0, 100.0);
    let completion_percentage = completion(rubric, &per_criterion, judges.len());
    let is_complete = rubric
        .required_criteria()
        .all(|c| per_criterion.contains_key(&c.key));
    let contributing_judge_count = judges.iter().filter(|r| !r.values.is_empty()).count();

    debug!(
        submission_id,
        total_score, completion_percentage, is_complete, "aggregated submission"
    );

    Ok(AggregatedScore {
        submission_id: submission_id.to_string(),
        total_score,
        completion_percentage,
        is_complete,
        per_criterion_averages: per_criterion,
        contributing_judge_count,
        rubric_id: rubric.id.clone(),
        rubric_version: rubric.version,
    })
}

/// Mean judge coverage over the counted criteria, as a percentage.
///
/// Required criteria are counted when the rubric has any; otherwise every
/// criterion is.
fn completion(
    rubric: &ScoringRubric,
    per_criterion: &BTreeMap<String, CriterionAverage>,
    judge_count: usize,
) -> f64 {
    if judge_count == 0 {
        return 0.0;
    }

    let has_required = rubric.required_criteria().next().is_some();
    let mut coverage_sum = 0.0;
    let mut counted = 0usize;
    for criterion in rubric
        .criteria
        .iter()
        .filter(|c| c.required || !has_required)
    {
        let responses = per_criterion
            .get(&criterion.key)
            .map(|a| a.contributing_judges)
            .unwrap_or(0);
        coverage_sum += responses as f64 / judge_count as f64;
        counted += 1;
    }

    if counted == 0 {
        return 0.0;
    }
    (coverage_sum / counted as f64 * 100.0).clamp(0.0, 100.0)
}
