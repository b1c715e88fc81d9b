//! Typed score values

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CriterionType, ScoringCriterion};

/// A single judge's raw value for one criterion.
///
/// Serialized as `{"type": "numeric", "value": 80.0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ScoreValue {
    Numeric(f64),
    Scale(f64),
    Boolean(bool),
}

impl ScoreValue {
    /// The criterion type this value can be recorded against
    pub fn value_type(&self) -> CriterionType {
        match self {
            ScoreValue::Numeric(_) => CriterionType::Numeric,
            ScoreValue::Scale(_) => CriterionType::Scale,
            ScoreValue::Boolean(_) => CriterionType::Boolean,
        }
    }

    /// Parse a textual value according to the criterion's declared type.
    ///
    /// Booleans accept `true/false`, `yes/no` and `1/0`.
    pub fn parse_for(criterion: &ScoringCriterion, input: &str) -> Result<Self, String> {
        let input = input.trim();
        match criterion.criterion_type {
            CriterionType::Numeric => parse_number(input).map(ScoreValue::Numeric),
            CriterionType::Scale => parse_number(input).map(ScoreValue::Scale),
            CriterionType::Boolean => match input.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(ScoreValue::Boolean(true)),
                "false" | "no" | "0" => Ok(ScoreValue::Boolean(false)),
                other => Err(format!("expected a boolean, got '{}'", other)),
            },
        }
    }
}

fn parse_number(input: &str) -> Result<f64, String> {
    input
        .parse::<f64>()
        .map_err(|_| format!("expected a number, got '{}'", input))
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Numeric(v) | ScoreValue::Scale(v) => write!(f, "{}", v),
            ScoreValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}
