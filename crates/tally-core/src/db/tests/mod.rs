mod scores;

use chrono::{DateTime, TimeZone, Utc};

use crate::db::Database;
use crate::roster::{Event, Submission, Team};
use crate::rubric::{CriterionType, RubricScope, ScoringCriterion, ScoringRubric};

pub(super) fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 12, hour, 0, 0).unwrap()
}

pub(super) fn rubric() -> ScoringRubric {
    ScoringRubric::new(
        "judging",
        "Judging",
        RubricScope::Event("demo".to_string()),
        vec![
            ScoringCriterion::new("impact", "Impact", CriterionType::Numeric, 10.0, 2.0).required(),
            ScoringCriterion::new("polish", "Polish", CriterionType::Numeric, 10.0, 1.0),
        ],
    )
}

/// Event `demo` with teams `red` and `blue`, one submission each
pub(super) fn seeded() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.insert_rubric(&rubric()).unwrap();
    db.insert_event(&Event {
        id: "demo".to_string(),
        name: "Demo Day".to_string(),
        rubric_id: "judging".to_string(),
        rubric_version: 1,
        created_at: at(8),
    })
    .unwrap();
    for (id, name) in [("red", "Red Team"), ("blue", "Blue Team")] {
        db.insert_team(&Team {
            id: id.to_string(),
            name: name.to_string(),
            created_at: at(8),
        })
        .unwrap();
        db.insert_submission(&Submission {
            id: format!("{}-1", id),
            team_id: id.to_string(),
            event_id: "demo".to_string(),
            submitted_at: at(9),
        })
        .unwrap();
    }
    db
}
