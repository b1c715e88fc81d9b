use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Global config lives inside each test directory, never in the user's home
const CONFIG_DIR: &str = "user-config";

/// Get a Command for tally running in `dir`
pub fn tally(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tally");
    cmd.current_dir(dir)
        .env("TALLY_CONFIG_DIR", dir.join(CONFIG_DIR))
        .env_remove("TALLY_STORE")
        .env_remove("TALLY_LOG")
        .env_remove("RUST_LOG");
    cmd
}

#[allow(dead_code)]
pub fn config_dir(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR)
}

/// Setup a test store and return the directory
pub fn setup_test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    tally(dir.path()).arg("init").assert().success();
    dir
}

/// Run tally and assert success
pub fn run_assert_success(dir: &Path, args: &[&str]) {
    tally(dir).args(args).assert().success();
}

/// Run tally and return stdout as String
#[allow(dead_code)]
pub fn run_and_get_stdout(dir: &Path, args: &[&str]) -> String {
    let output = tally(dir).args(args).output().unwrap();
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run tally with `--format json` and parse stdout
#[allow(dead_code)]
pub fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = tally(dir)
        .arg("--format")
        .arg("json")
        .args(args)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "tally {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

pub const DEMO_RUBRIC: &str = r#"id: demo
name: Demo night
criteria:
  - key: impact
    name: Impact
    type: numeric
    maxScore: 10
    weight: 2
    required: true
  - key: polish
    name: Polish
    type: numeric
    maxScore: 10
    weight: 1
"#;

/// Write a rubric file into `dir` and return its path
pub fn write_rubric(dir: &Path, file_name: &str, content: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, content).unwrap();
    path
}

/// Store with the demo rubric, event `night1` and teams red, blue and green
#[allow(dead_code)]
pub fn setup_event() -> TempDir {
    let dir = setup_test_dir();
    let path = dir.path();
    write_rubric(path, "demo.yaml", DEMO_RUBRIC);
    run_assert_success(path, &["rubric", "add", "demo.yaml"]);
    run_assert_success(path, &["event", "add", "night1", "--rubric", "demo"]);
    for (id, name) in [("red", "Red Team"), ("blue", "Blue Team"), ("green", "Green Team")] {
        run_assert_success(path, &["team", "add", id, "--name", name]);
    }
    dir
}

/// Record a submission and one judge's scores for it
#[allow(dead_code)]
pub fn submit_scored(dir: &Path, submission: &str, team: &str, event: &str, at: &str, values: &[&str]) {
    run_assert_success(
        dir,
        &["submission", "add", submission, "--team", team, "--event", event, "--at", at],
    );
    let mut args = vec!["score", "set", submission, "--judge", "j1"];
    args.extend_from_slice(values);
    run_assert_success(dir, &args);
}
