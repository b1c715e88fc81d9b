use crate::support::{
    run_and_get_stdout, run_assert_success, run_json, setup_test_dir, submit_scored, tally,
    write_rubric, DEMO_RUBRIC,
};
use predicates::prelude::*;

// ============================================================================
// History, trend and position commands
// ============================================================================

/// Three weekly events; atlas creeps up 70 → 71 → 72, borealis falls
/// 90 → 80 → 50. Each week's leaderboard is saved.
fn season() -> tempfile::TempDir {
    let dir = setup_test_dir();
    let path = dir.path();
    write_rubric(path, "demo.yaml", DEMO_RUBRIC);
    run_assert_success(path, &["rubric", "add", "demo.yaml"]);
    run_assert_success(path, &["team", "add", "atlas", "--name", "Atlas"]);
    run_assert_success(path, &["team", "add", "borealis", "--name", "Borealis"]);

    let weeks = [
        ("week1", "2026-01-05", "7", "9"),
        ("week2", "2026-01-12", "7.1", "8"),
        ("week3", "2026-01-19", "7.2", "5"),
    ];
    for (event, at, atlas, borealis) in weeks {
        run_assert_success(path, &["event", "add", event, "--rubric", "demo"]);
        let atlas_values = [format!("impact={}", atlas), format!("polish={}", atlas)];
        let borealis_values = [format!("impact={}", borealis), format!("polish={}", borealis)];
        submit_scored(
            path,
            &format!("atlas-{}", event),
            "atlas",
            event,
            at,
            &[&atlas_values[0], &atlas_values[1]],
        );
        submit_scored(
            path,
            &format!("borealis-{}", event),
            "borealis",
            event,
            at,
            &[&borealis_values[0], &borealis_values[1]],
        );
        run_assert_success(path, &["leaderboard", event, "--save"]);
    }
    dir
}

#[test]
fn test_history_lists_scores_in_time_order() {
    let dir = season();
    let history = run_json(dir.path(), &["history", "atlas"]);

    let scores: Vec<f64> = history["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["score"].as_f64().unwrap())
        .collect();
    assert_eq!(scores.len(), 3);
    for (actual, expected) in scores.iter().zip([70.0, 71.0, 72.0]) {
        assert!((actual - expected).abs() < 1e-6);
    }
    assert!((history["highest"].as_f64().unwrap() - 72.0).abs() < 1e-6);
    assert!((history["average"].as_f64().unwrap() - 71.0).abs() < 1e-6);
}

#[test]
fn test_history_bounds_and_event_filter() {
    let dir = season();

    let since = run_json(dir.path(), &["history", "atlas", "--since", "2026-01-10"]);
    assert_eq!(since["entries"].as_array().unwrap().len(), 2);

    let until = run_json(dir.path(), &["history", "atlas", "--until", "2026-01-05"]);
    assert_eq!(until["entries"].as_array().unwrap().len(), 1);

    let one_event = run_json(dir.path(), &["history", "borealis", "--event", "week2"]);
    assert_eq!(one_event["entries"][0]["eventId"], "week2");
    assert_eq!(one_event["entries"].as_array().unwrap().len(), 1);

    let records = run_and_get_stdout(dir.path(), &["--format", "records", "history", "atlas"]);
    assert!(records.starts_with("H tally=1 records=1 mode=history team=atlas entries=3"));
    assert!(records.contains("D atlas-week1 event=week1 score=70.00"));
}

#[test]
fn test_trend_directions() {
    let dir = season();

    let atlas = run_json(dir.path(), &["trend", "atlas"]);
    assert_eq!(atlas["direction"], "stable");
    assert_eq!(atlas["points"], 3);
    assert_eq!(atlas["teamId"], "atlas");

    let borealis = run_json(dir.path(), &["trend", "borealis"]);
    assert_eq!(borealis["direction"], "downward");

    let last_two = run_json(dir.path(), &["trend", "borealis", "--last", "2"]);
    assert_eq!(last_two["points"], 2);
    assert_eq!(last_two["window"]["kind"], "lastEntries");

    tally(dir.path())
        .args(["trend", "atlas"])
        .assert()
        .success()
        .stdout(predicate::str::contains("atlas: stable"));

    tally(dir.path())
        .args(["--format", "records", "trend", "borealis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T borealis direction=downward"));
}

#[test]
fn test_trend_range_window() {
    let dir = season();
    let trend = run_json(
        dir.path(),
        &["trend", "borealis", "--since", "2026-01-12", "--until", "2026-01-31"],
    );
    assert_eq!(trend["points"], 2);
    assert!((trend["change"].as_f64().unwrap() + 30.0).abs() < 1e-6);
}

#[test]
fn test_trend_single_point_is_stable() {
    let dir = season();
    let trend = run_json(dir.path(), &["trend", "atlas", "--event", "week2"]);
    assert_eq!(trend["points"], 1);
    assert_eq!(trend["direction"], "stable");
    assert_eq!(trend["magnitude"], 0.0);
}

#[test]
fn test_positions_across_saved_leaderboards() {
    let dir = season();

    let borealis = run_json(dir.path(), &["positions", "borealis"]);
    let placed: Vec<u64> = borealis["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["position"].as_u64().unwrap())
        .collect();
    assert_eq!(placed, vec![1, 1, 2]);
    assert_eq!(borealis["positionChange"], 1);
    assert_eq!(borealis["bestPosition"], 1);
    assert_eq!(borealis["currentPosition"], 2);
    assert_eq!(borealis["entries"][0]["totalTeams"], 2);

    let atlas = run_json(dir.path(), &["positions", "atlas", "--event", "week3"]);
    assert_eq!(atlas["entries"].as_array().unwrap().len(), 1);
    assert_eq!(atlas["currentPosition"], 1);
    assert!(atlas["positionChange"].is_null());

    tally(dir.path())
        .args(["positions", "borealis"])
        .assert()
        .success()
        .stdout(predicate::str::contains("last move down 1"));
}

#[test]
fn test_positions_without_snapshots() {
    let dir = setup_test_dir();
    run_assert_success(dir.path(), &["team", "add", "solo", "--name", "Solo"]);

    tally(dir.path())
        .args(["positions", "solo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved leaderboards include solo"));
}
