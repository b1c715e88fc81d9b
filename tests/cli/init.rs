use crate::support::{config_dir, run_assert_success, setup_test_dir, tally};
use predicates::prelude::*;
use tempfile::tempdir;

// ============================================================================
// Init command tests
// ============================================================================

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();

    tally(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized tally store"));

    assert!(dir.path().join(".tally/config.toml").exists());
    assert!(dir.path().join(".tally/tally.db").exists());
    assert!(dir.path().join(".tally/.gitignore").exists());
}

#[test]
fn test_init_idempotent() {
    let dir = setup_test_dir();
    run_assert_success(dir.path(), &["team", "add", "red", "--name", "Red"]);

    tally(dir.path()).arg("init").assert().success();

    tally(dir.path())
        .args(["team", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("red"));
}

#[test]
fn test_init_visible() {
    let dir = tempdir().unwrap();

    tally(dir.path())
        .args(["init", "--visible"])
        .assert()
        .success();

    assert!(dir.path().join("tally/config.toml").exists());
    assert!(!dir.path().join(".tally").exists());
}

#[test]
fn test_init_json_output() {
    let dir = tempdir().unwrap();

    tally(dir.path())
        .args(["--format", "json", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ok\""))
        .stdout(predicate::str::contains("\"remembered\": false"));
}

#[test]
fn test_discovery_from_subdirectory() {
    let dir = setup_test_dir();
    let nested = dir.path().join("a/b");
    std::fs::create_dir_all(&nested).unwrap();

    tally(&nested)
        .env("TALLY_CONFIG_DIR", config_dir(dir.path()))
        .args(["rubric", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hackathon"));
}

#[test]
fn test_remembered_store_used_outside_project() {
    let project = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();

    tally(project.path())
        .args(["init", "--remember"])
        .assert()
        .success();
    run_assert_success(project.path(), &["team", "add", "red", "--name", "Red"]);

    // No store above `elsewhere`; the remembered default is used
    tally(elsewhere.path())
        .env("TALLY_CONFIG_DIR", config_dir(project.path()))
        .args(["team", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Red"));
}

#[test]
fn test_explicit_store_flag() {
    let dir = tempdir().unwrap();

    tally(dir.path())
        .args(["--store", "scores", "init"])
        .assert()
        .success();
    assert!(dir.path().join("scores/tally.db").exists());

    tally(dir.path())
        .args(["--store", "scores", "event", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No events"));
}
