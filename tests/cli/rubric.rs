use crate::support::{
    run_and_get_stdout, run_assert_success, run_json, setup_event, setup_test_dir, submit_scored,
    tally, write_rubric, DEMO_RUBRIC,
};
use predicates::prelude::*;

// ============================================================================
// Rubric command tests
// ============================================================================

#[test]
fn test_rubric_add_list_show() {
    let dir = setup_test_dir();
    write_rubric(dir.path(), "demo.yaml", DEMO_RUBRIC);

    tally(dir.path())
        .args(["rubric", "add", "demo.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rubric demo added (version 1, 2 criteria)"));

    tally(dir.path())
        .args(["rubric", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Demo night"));

    let records = run_and_get_stdout(dir.path(), &["--format", "records", "rubric", "show", "demo"]);
    let lines: Vec<&str> = records.lines().collect();
    assert_eq!(lines[0], "H tally=1 records=1 mode=rubric");
    assert!(lines[1].starts_with("R demo version=1 scope=template criteria=2"));
    assert!(lines[2].starts_with("K demo impact type=numeric max=10 weight=2 required=true"));
    assert!(lines[3].starts_with("K demo polish"));
}

#[test]
fn test_rubric_add_json_file() {
    let dir = setup_test_dir();
    write_rubric(
        dir.path(),
        "quick.json",
        r#"{"id":"quick","name":"Quick","criteria":[{"key":"ok","name":"OK","type":"boolean","maxScore":1,"weight":1}]}"#,
    );
    run_assert_success(dir.path(), &["rubric", "add", "quick.json"]);

    let rubric = run_json(dir.path(), &["rubric", "show", "quick"]);
    assert_eq!(rubric["criteria"][0]["type"], "boolean");
}

#[test]
fn test_rubric_add_twice_conflicts() {
    let dir = setup_test_dir();
    write_rubric(dir.path(), "demo.yaml", DEMO_RUBRIC);
    run_assert_success(dir.path(), &["rubric", "add", "demo.yaml"]);

    tally(dir.path())
        .args(["rubric", "add", "demo.yaml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_rubric_update_requires_newer_version() {
    let dir = setup_test_dir();
    write_rubric(dir.path(), "demo.yaml", DEMO_RUBRIC);
    run_assert_success(dir.path(), &["rubric", "add", "demo.yaml"]);

    tally(dir.path())
        .args(["rubric", "add", "demo.yaml", "--update"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("rubric version"));

    let bumped = format!("version: 2\n{}", DEMO_RUBRIC.replace("Demo night", "Demo night II"));
    write_rubric(dir.path(), "demo-v2.yaml", &bumped);
    run_assert_success(dir.path(), &["rubric", "add", "demo-v2.yaml", "--update"]);

    let rubric = run_json(dir.path(), &["rubric", "show", "demo"]);
    assert_eq!(rubric["version"], 2);
    assert_eq!(rubric["name"], "Demo night II");
}

#[test]
fn test_rubric_validate() {
    let dir = setup_test_dir();
    write_rubric(dir.path(), "demo.yaml", DEMO_RUBRIC);
    tally(dir.path())
        .args(["rubric", "validate", "demo.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo is valid (2 criteria)"));

    write_rubric(
        dir.path(),
        "broken.yaml",
        "id: broken\nname: Broken\ncriteria:\n  - {key: a, name: A, type: numeric, maxScore: 10, weight: 1}\n  - {key: a, name: A2, type: numeric, maxScore: 10, weight: 1}\n",
    );
    tally(dir.path())
        .args(["rubric", "validate", "broken.yaml"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("duplicate key 'a'"));

    let output = tally(dir.path())
        .args(["--format", "json", "rubric", "validate", "broken.yaml"])
        .output()
        .unwrap();
    let envelope: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(envelope["error"]["type"], "invalid_rubric");
    assert!(envelope["error"]["errors"].as_array().is_some_and(|e| !e.is_empty()));
}

#[test]
fn test_rubric_templates_and_clone() {
    let dir = setup_test_dir();

    let templates = run_json(dir.path(), &["rubric", "templates"]);
    let ids: Vec<&str> = templates
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"hackathon"));
    assert!(ids.contains(&"pitch"));

    tally(dir.path())
        .args([
            "rubric", "clone", "hackathon", "spring-hack", "--group", "spring", "--name",
            "Spring hack",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned hackathon as spring-hack (group:spring)"));

    let cloned = run_json(dir.path(), &["rubric", "show", "spring-hack"]);
    assert_eq!(cloned["name"], "Spring hack");
    assert_eq!(cloned["version"], 1);
    assert_eq!(cloned["scope"]["kind"], "group");
}

#[test]
fn test_event_with_builtin_template_rubric() {
    let dir = setup_test_dir();
    run_assert_success(dir.path(), &["event", "add", "hack1", "--rubric", "hackathon"]);

    tally(dir.path())
        .args(["event", "add", "pitch1", "--rubric", "missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("rubric not found: missing"));

    tally(dir.path())
        .args(["--format", "records", "event", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("V hack1 rubric=hackathon"));
}

#[test]
fn test_rubric_update_leaves_scored_event_on_old_version() {
    let dir = setup_event();
    let path = dir.path();
    submit_scored(path, "red-1", "red", "night1", "2026-01-05", &["impact=8", "polish=6"]);
    let before = run_json(path, &["leaderboard", "night1"]);

    // Version 2 drops polish
    let trimmed = format!(
        "version: 2\n{}",
        DEMO_RUBRIC.split("  - key: polish").next().unwrap()
    );
    write_rubric(path, "demo-v2.yaml", &trimmed);
    run_assert_success(path, &["rubric", "add", "demo-v2.yaml", "--update"]);
    assert_eq!(run_json(path, &["rubric", "show", "demo"])["criteria"].as_array().unwrap().len(), 1);

    let after = run_json(path, &["leaderboard", "night1"]);
    assert_eq!(after["metadata"]["digest"], before["metadata"]["digest"]);
    let aggregated = run_json(path, &["aggregate", "red-1"]);
    assert_eq!(aggregated["rubricVersion"], 1);
    assert!(aggregated["perCriterionAverages"]["polish"].is_object());
    run_assert_success(path, &["history", "red"]);
    run_assert_success(path, &["score", "set", "red-1", "--judge", "j2", "polish=5"]);

    run_assert_success(path, &["event", "add", "night2", "--rubric", "demo"]);
    let events = run_and_get_stdout(path, &["--format", "records", "event", "list"]);
    assert!(events.contains("V night1 rubric=demo version=1"));
    assert!(events.contains("V night2 rubric=demo version=2"));
}
