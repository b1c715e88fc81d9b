use crate::support::{run_and_get_stdout, run_assert_success, run_json, setup_event, submit_scored, tally};
use predicates::prelude::*;
use std::path::Path;

// ============================================================================
// Leaderboard command tests
// ============================================================================

/// red 90, blue 70; green registered but not entered
fn scored_event() -> tempfile::TempDir {
    let dir = setup_event();
    submit_scored(dir.path(), "red-1", "red", "night1", "2026-01-05", &["impact=9", "polish=9"]);
    submit_scored(dir.path(), "blue-1", "blue", "night1", "2026-01-05", &["impact=7", "polish=7"]);
    dir
}

fn team_order(dir: &Path, args: &[&str]) -> Vec<String> {
    let mut full = vec!["leaderboard", "night1"];
    full.extend_from_slice(args);
    let board = run_json(dir, &full);
    board["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["teamId"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_leaderboard_human_output() {
    let dir = scored_event();
    tally(dir.path())
        .args(["leaderboard", "night1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Red Team"))
        .stdout(predicate::str::contains("2. Blue Team"))
        .stdout(predicate::str::contains("2 of 2 teams ranked by average-score"));
}

#[test]
fn test_leaderboard_json_entries() {
    let dir = scored_event();
    let board = run_json(dir.path(), &["leaderboard", "night1"]);

    assert_eq!(board["eventId"], "night1");
    assert_eq!(board["saved"], false);
    let entries = board["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["teamId"], "red");
    assert_eq!(entries[0]["position"], 1);
    assert_eq!(entries[1]["teamId"], "blue");
    assert_eq!(entries[1]["position"], 2);
    assert!((entries[0]["averageScore"].as_f64().unwrap() - 90.0).abs() < 1e-6);
    assert_eq!(board["metadata"]["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_leaderboard_digest_is_stable() {
    let dir = scored_event();
    let first = run_json(dir.path(), &["leaderboard", "night1"]);
    let second = run_json(dir.path(), &["leaderboard", "night1"]);
    assert_eq!(first["metadata"]["digest"], second["metadata"]["digest"]);
}

#[test]
fn test_leaderboard_filters() {
    let dir = scored_event();
    let path = dir.path();

    assert_eq!(team_order(path, &["--top", "1"]), vec!["red"]);
    assert_eq!(team_order(path, &["--team", "blue"]), vec!["blue"]);
    assert_eq!(team_order(path, &["--min-score", "80"]), vec!["red"]);
    assert_eq!(
        team_order(path, &["--sort", "team-name", "--direction", "asc"]),
        vec!["blue", "red"]
    );
    assert_eq!(team_order(path, &["--direction", "asc"]), vec!["blue", "red"]);

    let board = run_json(path, &["leaderboard", "night1", "--team", "blue"]);
    assert_eq!(board["entries"][0]["position"], 1);
}

#[test]
fn test_entered_team_without_submission_ranks_last() {
    let dir = scored_event();
    run_assert_success(
        dir.path(),
        &["team", "add", "gold", "--name", "Gold Team", "--event", "night1"],
    );

    let board = run_json(dir.path(), &["leaderboard", "night1"]);
    let entries = board["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2]["teamId"], "gold");
    assert_eq!(entries[2]["submissionCount"], 0);
    assert_eq!(entries[2]["averageScore"], 0.0);

    assert_eq!(
        team_order(dir.path(), &["--min-submissions", "1"]),
        vec!["red", "blue"]
    );
}

#[test]
fn test_exclude_incomplete() {
    let dir = scored_event();
    // polish only: the required impact criterion is unscored
    submit_scored(dir.path(), "green-1", "green", "night1", "2026-01-05", &["polish=10"]);

    let with_all = team_order(dir.path(), &[]);
    assert!(with_all.contains(&"green".to_string()));

    let board = run_json(dir.path(), &["leaderboard", "night1", "--exclude-incomplete"]);
    let green = board["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["teamId"] == "green")
        .unwrap()
        .clone();
    assert_eq!(green["submissionCount"], 0);
}

#[test]
fn test_config_ranking_defaults_and_overrides() {
    let dir = scored_event();
    std::fs::write(
        dir.path().join(".tally/config.toml"),
        "[ranking]\nsort = \"team-name\"\ndirection = \"ascending\"\n\n[output]\nprecision = 1\n",
    )
    .unwrap();

    assert_eq!(team_order(dir.path(), &[]), vec!["blue", "red"]);
    assert_eq!(
        team_order(dir.path(), &["--sort", "average-score", "--direction", "desc"]),
        vec!["red", "blue"]
    );

    let records = run_and_get_stdout(dir.path(), &["--format", "records", "leaderboard", "night1"]);
    assert!(records.contains("E 1 blue \"Blue Team\" total=70.0 average=70.0 submissions=1"));
}

#[test]
fn test_save_and_diff_against_previous_snapshot() {
    let dir = scored_event();
    let path = dir.path();

    tally(path)
        .args(["leaderboard", "night1", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshot saved"));

    // blue overtakes red
    run_assert_success(path, &["score", "set", "blue-1", "--judge", "j1", "impact=10", "polish=10"]);

    let records = run_and_get_stdout(
        path,
        &["--format", "records", "leaderboard", "night1", "--diff"],
    );
    let lines: Vec<&str> = records.lines().collect();
    assert!(lines[0].starts_with("H tally=1 records=1 mode=leaderboard event=night1 entries=2"));
    assert!(lines[0].contains("digest="));
    assert!(lines[1].starts_with("E 1 blue"));
    assert!(lines[1].ends_with("change=-1"));
    assert!(lines[2].starts_with("E 2 red"));
    assert!(lines[2].ends_with("change=1"));

    let board = run_json(path, &["leaderboard", "night1", "--diff"]);
    assert_eq!(board["diff"]["movements"][0]["teamId"], "blue");
    assert_eq!(board["diff"]["movements"][0]["change"], -1);
}
