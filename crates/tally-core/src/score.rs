//! Per-judge score records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::rubric::{check_score, ScoreValue, ScoringRubric};

/// One judge's scores for one submission.
///
/// Records are replaced whole on update (see [`ScoreRecord::replaced`]);
/// readers never observe a half-updated record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub submission_id: String,
    pub judge_id: String,
    pub event_id: String,
    /// Sparse criterion key → value map; absent keys are simply not scored yet
    #[serde(default)]
    pub values: BTreeMap<String, ScoreValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Cached total written by the aggregator; never used as input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn new(
        submission_id: impl Into<String>,
        judge_id: impl Into<String>,
        event_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            judge_id: judge_id.into(),
            event_id: event_id.into(),
            values: BTreeMap::new(),
            comment: None,
            total: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: ScoreValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// A full replacement of this record: same identity and creation time,
    /// new values, cleared cached total.
    pub fn replaced(
        &self,
        values: BTreeMap<String, ScoreValue>,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: self.submission_id.clone(),
            judge_id: self.judge_id.clone(),
            event_id: self.event_id.clone(),
            values,
            comment,
            total: None,
            created_at: self.created_at,
            updated_at: now,
        }
    }

    /// Check every present key against the rubric it is scored with
    pub fn validate_against(&self, rubric: &ScoringRubric) -> Result<(), ValidationError> {
        for (key, value) in &self.values {
            let criterion =
                rubric
                    .criterion(key)
                    .ok_or_else(|| ValidationError::UnknownCriterion {
                        rubric_id: rubric.id.clone(),
                        key: key.clone(),
                    })?;
            check_score(criterion, value).map_err(|reason| ValidationError::InvalidScoreValue {
                key: key.clone(),
                judge_id: self.judge_id.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}

/// A submission together with every judge record it has received
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionScores {
    pub submission_id: String,
    pub team_id: String,
    pub submitted_at: DateTime<Utc>,
    pub records: Vec<ScoreRecord>,
}
