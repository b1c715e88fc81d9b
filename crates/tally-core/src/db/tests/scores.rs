use std::collections::BTreeMap;

use super::*;
use crate::engine::{compute_event_leaderboard, team_score_history};
use crate::error::{TallyError, ValidationError};
use crate::leaderboard::RankingOptions;
use crate::roster::Team;
use crate::rubric::ScoreValue;
use crate::source::{RubricSource, ScoreRecordSource, TeamDirectory};

fn values(pairs: &[(&str, f64)]) -> BTreeMap<String, ScoreValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), ScoreValue::Numeric(*v)))
        .collect()
}

#[test]
fn test_set_scores_inserts_then_replaces_whole_record() {
    let db = seeded();
    let first = db
        .set_scores(
            "red-1",
            "judge-a",
            values(&[("impact", 8.0), ("polish", 6.0)]),
            Some("solid".to_string()),
            at(10),
        )
        .unwrap();
    assert_eq!(first.event_id, "demo");
    assert!(first.total.is_some());

    let second = db
        .set_scores("red-1", "judge-a", values(&[("impact", 9.0)]), None, at(11))
        .unwrap();
    assert_eq!(second.created_at, at(10));
    assert_eq!(second.updated_at, at(11));

    let stored = db.score_record("red-1", "judge-a").unwrap().unwrap();
    assert_eq!(stored, second);
    assert!(!stored.values.contains_key("polish"));
    assert_eq!(stored.comment, None);
    assert_eq!(db.score_record_count().unwrap(), 1);
}

#[test]
fn test_set_scores_validates_against_event_rubric() {
    let db = seeded();
    let unknown = db.set_scores("red-1", "judge-a", values(&[("charm", 5.0)]), None, at(10));
    assert!(matches!(
        unknown,
        Err(TallyError::Validation(ValidationError::UnknownCriterion { .. }))
    ));

    let too_high = db.set_scores("red-1", "judge-a", values(&[("impact", 11.0)]), None, at(10));
    assert!(matches!(
        too_high,
        Err(TallyError::Validation(ValidationError::InvalidScoreValue { .. }))
    ));

    let missing = db.set_scores("nope", "judge-a", values(&[("impact", 1.0)]), None, at(10));
    assert!(matches!(missing, Err(TallyError::NotFound { .. })));
    assert_eq!(db.score_record_count().unwrap(), 0);
}

#[test]
fn test_event_snapshot_groups_records() {
    let db = seeded();
    db.insert_team(&Team {
        id: "green".to_string(),
        name: "Green".to_string(),
        created_at: at(8),
    })
    .unwrap();
    db.add_participant("demo", "green").unwrap();

    db.set_scores("red-1", "judge-b", values(&[("impact", 7.0)]), None, at(10))
        .unwrap();
    db.set_scores("red-1", "judge-a", values(&[("impact", 9.0)]), None, at(10))
        .unwrap();
    db.set_scores("blue-1", "judge-a", values(&[("polish", 3.0)]), None, at(10))
        .unwrap();

    let snapshot = db.event_snapshot("demo").unwrap();
    assert_eq!(snapshot.rubric.id, "judging");
    let team_ids: Vec<&str> = snapshot.teams.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(team_ids, vec!["blue", "green", "red"]);

    let red = snapshot
        .submissions
        .iter()
        .find(|s| s.submission_id == "red-1")
        .unwrap();
    let judges: Vec<&str> = red.records.iter().map(|r| r.judge_id.as_str()).collect();
    assert_eq!(judges, vec!["judge-a", "judge-b"]);

    assert_eq!(db.records_for_submission("blue-1").unwrap().len(), 1);
    assert!(matches!(
        db.event_snapshot("missing"),
        Err(TallyError::NotFound { .. })
    ));
}

#[test]
fn test_rubric_edit_after_scoring_keeps_event_on_its_version() {
    let db = seeded();
    db.set_scores(
        "red-1",
        "judge-a",
        values(&[("impact", 8.0), ("polish", 5.0)]),
        None,
        at(10),
    )
    .unwrap();
    let before = compute_event_leaderboard(&db, "demo", &RankingOptions::default(), at(11)).unwrap();

    let trimmed = rubric().without_criterion("polish");
    db.update_rubric(&trimmed).unwrap();
    assert_eq!(db.rubric("judging").unwrap().version, 2);
    assert!(db.rubric_version("judging", 1).unwrap().criterion("polish").is_some());

    let after = compute_event_leaderboard(&db, "demo", &RankingOptions::default(), at(12)).unwrap();
    assert_eq!(after.metadata.digest, before.metadata.digest);
    let history = team_score_history(&db, "red", None).unwrap();
    assert_eq!(history.entries()[0].score, before.entry("red").unwrap().total_score);

    // The stored event still validates against the criteria it was given
    db.set_scores("blue-1", "judge-a", values(&[("polish", 4.0)]), None, at(12))
        .unwrap();
    assert_eq!(db.event("demo").unwrap().rubric_version, 1);

    db.insert_event(&Event {
        id: "final".to_string(),
        name: "Final".to_string(),
        rubric_id: "judging".to_string(),
        rubric_version: 2,
        created_at: at(12),
    })
    .unwrap();
    db.insert_submission(&Submission {
        id: "red-2".to_string(),
        team_id: "red".to_string(),
        event_id: "final".to_string(),
        submitted_at: at(13),
    })
    .unwrap();
    let dropped = db.set_scores("red-2", "judge-a", values(&[("polish", 4.0)]), None, at(13));
    assert!(matches!(
        dropped,
        Err(TallyError::Validation(ValidationError::UnknownCriterion { .. }))
    ));
    assert_eq!(db.event_snapshot("final").unwrap().rubric.version, 2);
}
