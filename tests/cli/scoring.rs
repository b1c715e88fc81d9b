use crate::support::{run_and_get_stdout, run_assert_success, run_json, setup_event, tally};
use predicates::prelude::*;

// ============================================================================
// Submissions, scores and aggregation
// ============================================================================

fn submit(dir: &std::path::Path, id: &str, team: &str) {
    run_assert_success(
        dir,
        &["submission", "add", id, "--team", team, "--event", "night1", "--at", "2026-01-05"],
    );
}

#[test]
fn test_score_set_and_aggregate_partial_judging() {
    let dir = setup_event();
    let path = dir.path();
    submit(path, "red-1", "red");

    run_assert_success(path, &["score", "set", "red-1", "--judge", "j1", "impact=8", "polish=6"]);
    run_assert_success(path, &["score", "set", "red-1", "--judge", "j2", "impact=6"]);

    let aggregated = run_json(path, &["aggregate", "red-1"]);
    // impact averages 7/10, polish 6/10; weights 2 and 1
    let total = aggregated["totalScore"].as_f64().unwrap();
    assert!((total - 200.0 / 3.0).abs() < 1e-6);
    assert_eq!(aggregated["contributingJudgeCount"], 2);
    assert_eq!(aggregated["perCriterionAverages"]["polish"]["contributingJudges"], 1);
    assert_eq!(aggregated["isComplete"], true);

    let records = run_and_get_stdout(path, &["--format", "records", "aggregate", "red-1"]);
    assert!(records.starts_with("H tally=1 records=1 mode=aggregate rubric=demo version=1"));
    assert!(records.contains("A red-1 total=66.67"));
    assert!(records.contains("C red-1 impact average=7.00 normalized=70.00 judges=2"));
}

#[test]
fn test_score_set_replaces_whole_record() {
    let dir = setup_event();
    let path = dir.path();
    submit(path, "red-1", "red");

    run_assert_success(
        path,
        &["score", "set", "red-1", "--judge", "j1", "--comment", "solid", "impact=8", "polish=6"],
    );
    run_assert_success(path, &["score", "set", "red-1", "--judge", "j1", "impact=10"]);

    let records = run_json(path, &["score", "list", "red-1"]);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["values"]["impact"]["value"], 10.0);
    assert!(records[0]["values"].get("polish").is_none());
    assert!(records[0].get("comment").is_none_or(|c| c.is_null()));

    tally(path)
        .args(["--format", "records", "score", "list", "red-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S red-1 j1 total=100.00 impact=10"));
}

#[test]
fn test_score_set_rejections() {
    let dir = setup_event();
    let path = dir.path();
    submit(path, "red-1", "red");

    tally(path)
        .args(["score", "set", "red-1", "--judge", "j1", "style=3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("criterion 'style' is not part of rubric 'demo'"));

    tally(path)
        .args(["score", "set", "red-1", "--judge", "j1", "impact=11"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("invalid value for criterion 'impact'"));

    tally(path)
        .args(["score", "set", "red-1", "--judge", "j1", "impact=lots"])
        .assert()
        .code(3);

    tally(path)
        .args(["score", "set", "red-1", "--judge", "j1", "impact"])
        .assert()
        .code(2);

    tally(path)
        .args(["score", "set", "ghost", "--judge", "j1", "impact=3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("submission not found"));

    // Nothing was stored by the rejected writes
    let records = run_json(path, &["score", "list", "red-1"]);
    assert_eq!(records.as_array().unwrap().len(), 0);
}

#[test]
fn test_submission_requires_known_team_and_event() {
    let dir = setup_event();
    let path = dir.path();

    tally(path)
        .args(["submission", "add", "x-1", "--team", "nobody", "--event", "night1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("team not found"));

    tally(path)
        .args(["submission", "add", "x-1", "--team", "red", "--event", "nothing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("event not found"));

    submit(path, "red-1", "red");
    tally(path)
        .args(["submission", "add", "red-1", "--team", "red", "--event", "night1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_progress_lists_missing_judges() {
    let dir = setup_event();
    let path = dir.path();
    submit(path, "red-1", "red");
    submit(path, "blue-1", "blue");
    run_assert_success(path, &["score", "set", "red-1", "--judge", "j1", "impact=8", "polish=6"]);
    run_assert_success(path, &["score", "set", "red-1", "--judge", "j2", "impact=7", "polish=7"]);
    run_assert_success(path, &["score", "set", "blue-1", "--judge", "j1", "impact=5", "polish=5"]);

    let progress = run_json(path, &["progress", "night1"]);
    assert_eq!(progress["judges"], serde_json::json!(["j1", "j2"]));
    let blue = progress["submissions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["submissionId"] == "blue-1")
        .unwrap()
        .clone();
    assert_eq!(blue["missingJudges"], serde_json::json!(["j2"]));

    tally(path)
        .args(["progress", "night1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing: j2"));
}
