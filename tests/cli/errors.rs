use crate::support::{setup_test_dir, tally};
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// Exit codes and error envelopes
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: tally"))
        .stdout(predicate::str::contains("leaderboard"))
        .stdout(predicate::str::contains("trend"));
}

#[test]
fn test_no_subcommand_prints_version() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("tally "));
}

#[test]
fn test_missing_store_exit_code() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .args(["leaderboard", "night1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

#[test]
fn test_missing_store_json_envelope() {
    let dir = tempdir().unwrap();
    let output = tally(dir.path())
        .args(["--format", "json", "progress", "night1"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    let envelope: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(envelope["error"]["code"], 3);
    assert_eq!(envelope["error"]["type"], "store_not_found");
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .args(["leaderboard", "night1", "--bogus"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_flag_json_envelope() {
    let dir = tempdir().unwrap();
    let output = tally(dir.path())
        .args(["--format", "json", "leaderboard", "night1", "--top", "0"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let envelope: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(envelope["error"]["type"], "usage_error");
}

#[test]
fn test_bad_format_value() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .args(["--format", "xml", "event", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_not_found_errors() {
    let dir = setup_test_dir();

    tally(dir.path())
        .args(["leaderboard", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("event not found: nope"));

    tally(dir.path())
        .args(["aggregate", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("submission not found"));

    tally(dir.path())
        .args(["trend", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("team not found"));
}

#[test]
fn test_quiet_suppresses_error_text() {
    let dir = tempdir().unwrap();
    tally(dir.path())
        .args(["--quiet", "event", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::is_empty());
}
