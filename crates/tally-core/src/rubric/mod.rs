//! Rubric model
//!
//! A rubric is an immutable, ordered set of weighted and typed criteria.
//! Edits never happen in place: every edit returns a new rubric value with a
//! bumped `version`, so aggregated scores computed against an older version
//! keep referring to what actually produced them.

pub mod templates;
mod validate;
mod value;

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError, ValidationError};

pub use validate::{check_score, is_valid_score};
pub use value::ScoreValue;

/// How a criterion is scored by a judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionType {
    /// Free number in `[0, maxScore]`
    Numeric,
    /// Number within a declared `[min, max]` range
    Scale,
    /// Met / not met
    Boolean,
}

impl FromStr for CriterionType {
    type Err = TallyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" => Ok(CriterionType::Numeric),
            "scale" => Ok(CriterionType::Scale),
            "boolean" => Ok(CriterionType::Boolean),
            other => Err(TallyError::unsupported(
                "criterion type",
                other,
                "numeric, scale, boolean",
            )),
        }
    }
}

impl fmt::Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionType::Numeric => write!(f, "numeric"),
            CriterionType::Scale => write!(f, "scale"),
            CriterionType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Type-specific criterion options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionOptions {
    /// Lower bound of a scale criterion (defaults to 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound of a scale criterion (defaults to `maxScore`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Guidance shown to judges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CriterionOptions {
    fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.description.is_none()
    }
}

/// A single named, typed, weighted axis of evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringCriterion {
    /// Key, unique within its rubric
    pub key: String,
    /// Display name
    pub name: String,
    #[serde(rename = "type")]
    pub criterion_type: CriterionType,
    pub max_score: f64,
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "CriterionOptions::is_empty")]
    pub options: CriterionOptions,
}

impl ScoringCriterion {
    /// Create an optional criterion with no extra options
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        criterion_type: CriterionType,
        max_score: f64,
        weight: f64,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            criterion_type,
            max_score,
            weight,
            required: false,
            options: CriterionOptions::default(),
        }
    }

    /// Mark the criterion as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Declare the `[min, max]` range of a scale criterion
    pub fn with_scale_range(mut self, min: f64, max: f64) -> Self {
        self.options.min = Some(min);
        self.options.max = Some(max);
        self
    }

    /// Attach judge guidance
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    /// Effective scale range, defaulting to `[0, maxScore]`
    pub fn scale_range(&self) -> (f64, f64) {
        (
            self.options.min.unwrap_or(0.0),
            self.options.max.unwrap_or(self.max_score),
        )
    }

    /// Raw numeric reading of a value in criterion units.
    ///
    /// A met boolean counts as `maxScore`, an unmet one as zero.
    pub fn raw_value(&self, value: &ScoreValue) -> f64 {
        match value {
            ScoreValue::Numeric(v) | ScoreValue::Scale(v) => *v,
            ScoreValue::Boolean(true) => self.max_score,
            ScoreValue::Boolean(false) => 0.0,
        }
    }

    /// Map a raw reading in criterion units onto `[0, 100]`
    pub fn normalize(&self, raw: f64) -> f64 {
        let normalized = match self.criterion_type {
            CriterionType::Scale => {
                let (min, max) = self.scale_range();
                if max > min {
                    (raw - min) / (max - min) * 100.0
                } else {
                    0.0
                }
            }
            CriterionType::Numeric | CriterionType::Boolean => raw / self.max_score * 100.0,
        };
        normalized.clamp(0.0, 100.0)
    }
}

/// Who a rubric belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum RubricScope {
    /// Reusable starting point
    #[default]
    Template,
    /// Shared by every event of a group
    Group(String),
    /// Specific to one event
    Event(String),
}

impl fmt::Display for RubricScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RubricScope::Template => write!(f, "template"),
            RubricScope::Group(id) => write!(f, "group:{}", id),
            RubricScope::Event(id) => write!(f, "event:{}", id),
        }
    }
}

fn default_version() -> u32 {
    1
}

/// A named, weighted set of scoring criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRubric {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub scope: RubricScope,
    /// Bumped by every copy-on-write edit
    #[serde(default = "default_version")]
    pub version: u32,
    pub criteria: Vec<ScoringCriterion>,
}

impl ScoringRubric {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        scope: RubricScope,
        criteria: Vec<ScoringCriterion>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            scope,
            version: 1,
            criteria,
        }
    }

    /// Look up a criterion by key
    pub fn criterion(&self, key: &str) -> Option<&ScoringCriterion> {
        self.criteria.iter().find(|c| c.key == key)
    }

    /// Unweighted ceiling: sum of every criterion's `maxScore`
    pub fn max_possible_score(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_score).sum()
    }

    /// Sum of `maxScore × weight` across criteria
    pub fn weighted_max_score(&self) -> f64 {
        self.criteria.iter().map(|c| c.max_score * c.weight).sum()
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|c| c.weight).sum()
    }

    pub fn required_criteria(&self) -> impl Iterator<Item = &ScoringCriterion> {
        self.criteria.iter().filter(|c| c.required)
    }

    /// Field-level validation messages; empty when the rubric is usable
    pub fn validate(&self) -> Vec<String> {
        validate::validate_rubric(self)
    }

    /// Reject the rubric unless it validates cleanly
    pub fn ensure_valid(&self) -> std::result::Result<(), ValidationError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::InvalidRubric { errors })
        }
    }

    fn next_version(&self) -> Self {
        let mut next = self.clone();
        next.version = self.version.saturating_add(1);
        next
    }

    /// New rubric with the criterion appended
    pub fn with_criterion(&self, criterion: ScoringCriterion) -> Self {
        let mut next = self.next_version();
        next.criteria.push(criterion);
        next
    }

    /// New rubric without the criterion named `key`
    pub fn without_criterion(&self, key: &str) -> Self {
        let mut next = self.next_version();
        next.criteria.retain(|c| c.key != key);
        next
    }

    /// New rubric with the criterion named `criterion.key` replaced.
    ///
    /// Returns `None` when no such criterion exists.
    pub fn with_updated_criterion(&self, criterion: ScoringCriterion) -> Option<Self> {
        let index = self.criteria.iter().position(|c| c.key == criterion.key)?;
        let mut next = self.next_version();
        next.criteria[index] = criterion;
        Some(next)
    }

    /// New rubric with a different display name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        let mut next = self.next_version();
        next.name = name.into();
        next
    }

    /// Independent copy under a new id and scope, starting at version 1
    pub fn cloned_as(&self, id: impl Into<String>, scope: RubricScope) -> Self {
        Self {
            id: id.into(),
            scope,
            version: 1,
            ..self.clone()
        }
    }

    /// Load a rubric from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TallyError::FailedOperation {
            operation: format!("read rubric file {}", path.display()),
            reason: e.to_string(),
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            other => Err(TallyError::unsupported(
                "rubric file extension",
                other.unwrap_or("<none>"),
                "yaml, yml, json",
            )),
        }
    }
}
