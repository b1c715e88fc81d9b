//! Rubric and score value validation

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::{CriterionType, ScoreValue, ScoringCriterion, ScoringRubric};

static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn key_pattern() -> &'static Regex {
    KEY_PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z][a-z0-9_]*$").expect("criterion key pattern is a valid regex")
    })
}

/// Whether `value` satisfies the criterion's validity predicate
pub fn is_valid_score(criterion: &ScoringCriterion, value: &ScoreValue) -> bool {
    check_score(criterion, value).is_ok()
}

/// Like [`is_valid_score`], with the reason a value is rejected
pub fn check_score(criterion: &ScoringCriterion, value: &ScoreValue) -> Result<(), String> {
    match (criterion.criterion_type, value) {
        (CriterionType::Numeric, ScoreValue::Numeric(v)) => {
            check_range(*v, 0.0, criterion.max_score)
        }
        (CriterionType::Scale, ScoreValue::Scale(v)) => {
            let (min, max) = criterion.scale_range();
            check_range(*v, min, max)
        }
        (CriterionType::Boolean, ScoreValue::Boolean(_)) => Ok(()),
        (expected, other) => Err(format!(
            "expected a {} value, got {}",
            expected,
            other.value_type()
        )),
    }
}

fn check_range(value: f64, min: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} is not a finite number", value));
    }
    if value < min || value > max {
        return Err(format!("{} is outside [{}, {}]", value, min, max));
    }
    Ok(())
}

pub(super) fn validate_rubric(rubric: &ScoringRubric) -> Vec<String> {
    let mut errors = Vec::new();

    if rubric.id.trim().is_empty() {
        errors.push("id: must not be empty".to_string());
    }
    if rubric.name.trim().is_empty() {
        errors.push("name: must not be empty".to_string());
    }
    if rubric.criteria.is_empty() {
        errors.push("criteria: at least one criterion is required".to_string());
    }

    let mut seen = HashSet::new();
    for (index, criterion) in rubric.criteria.iter().enumerate() {
        let field = format!("criteria[{}]", index);

        if criterion.key.is_empty() {
            errors.push(format!("{}.key: must not be empty", field));
        } else if !key_pattern().is_match(&criterion.key) {
            errors.push(format!(
                "{}.key: '{}' must be lowercase letters, digits or underscores, starting with a letter",
                field, criterion.key
            ));
        }
        if !seen.insert(criterion.key.as_str()) {
            errors.push(format!("{}.key: duplicate key '{}'", field, criterion.key));
        }
        if criterion.name.trim().is_empty() {
            errors.push(format!("{}.name: must not be empty", field));
        }
        if !(criterion.max_score.is_finite() && criterion.max_score > 0.0) {
            errors.push(format!(
                "{}.maxScore: must be a positive number, got {}",
                field, criterion.max_score
            ));
        }
        if !(criterion.weight.is_finite() && criterion.weight > 0.0) {
            errors.push(format!(
                "{}.weight: must be a positive number, got {}",
                field, criterion.weight
            ));
        }

        if criterion.criterion_type == CriterionType::Scale {
            let (min, max) = criterion.scale_range();
            if !(min.is_finite() && max.is_finite()) {
                errors.push(format!("{}.options: scale bounds must be finite", field));
            } else if min >= max {
                errors.push(format!(
                    "{}.options: scale min ({}) must be below max ({})",
                    field, min, max
                ));
            } else if min < 0.0 {
                errors.push(format!(
                    "{}.options.min: must not be negative, got {}",
                    field, min
                ));
            }
        } else if criterion.options.min.is_some() || criterion.options.max.is_some() {
            errors.push(format!(
                "{}.options: min/max only apply to scale criteria",
                field
            ));
        }
    }

    errors
}
