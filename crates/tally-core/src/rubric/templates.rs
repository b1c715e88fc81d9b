//! Built-in rubric templates

use super::{CriterionType, RubricScope, ScoringCriterion, ScoringRubric};

/// Template rubrics shipped with tally, in a stable order
pub fn builtin() -> Vec<ScoringRubric> {
    vec![hackathon(), pitch(), design_review()]
}

/// Find a built-in template by id
pub fn find(id: &str) -> Option<ScoringRubric> {
    builtin().into_iter().find(|r| r.id == id)
}

fn hackathon() -> ScoringRubric {
    let mut rubric = ScoringRubric::new(
        "hackathon",
        "Hackathon",
        RubricScope::Template,
        vec![
            ScoringCriterion::new("technical", "Technical execution", CriterionType::Numeric, 10.0, 3.0)
                .required(),
            ScoringCriterion::new("creativity", "Creativity", CriterionType::Numeric, 10.0, 2.0)
                .required(),
            ScoringCriterion::new("impact", "Potential impact", CriterionType::Numeric, 10.0, 2.0),
            ScoringCriterion::new("presentation", "Presentation", CriterionType::Scale, 5.0, 1.0)
                .with_scale_range(1.0, 5.0),
            ScoringCriterion::new("working_demo", "Working demo", CriterionType::Boolean, 10.0, 1.0)
                .with_description("The team showed the project running end to end"),
        ],
    );
    rubric.description = Some("General-purpose hackathon judging".to_string());
    rubric
}

fn pitch() -> ScoringRubric {
    let mut rubric = ScoringRubric::new(
        "pitch",
        "Pitch competition",
        RubricScope::Template,
        vec![
            ScoringCriterion::new("problem", "Problem clarity", CriterionType::Scale, 5.0, 1.0)
                .with_scale_range(1.0, 5.0)
                .required(),
            ScoringCriterion::new("market", "Market opportunity", CriterionType::Scale, 5.0, 1.5)
                .with_scale_range(1.0, 5.0)
                .required(),
            ScoringCriterion::new("delivery", "Delivery", CriterionType::Scale, 5.0, 1.0)
                .with_scale_range(1.0, 5.0),
        ],
    );
    rubric.description = Some("Short-form startup pitches".to_string());
    rubric
}

fn design_review() -> ScoringRubric {
    let mut rubric = ScoringRubric::new(
        "design-review",
        "Design review",
        RubricScope::Template,
        vec![
            ScoringCriterion::new("usability", "Usability", CriterionType::Numeric, 100.0, 2.0)
                .required(),
            ScoringCriterion::new("aesthetics", "Aesthetics", CriterionType::Numeric, 100.0, 1.0),
            ScoringCriterion::new("accessible", "Meets accessibility checklist", CriterionType::Boolean, 1.0, 1.0)
                .required(),
        ],
    );
    rubric.description = Some("Peer review of interface designs".to_string());
    rubric
}
