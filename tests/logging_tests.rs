use predicates::prelude::*;
use serial_test::serial;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::base_moodiary_command;

/// Json log lines carry the root span and its correlation id
#[test]
#[serial]
fn test_json_logs_include_correlation_id() {
    let temp_dir = tempdir().unwrap();
    let output = base_moodiary_command(temp_dir.path())
        .args(["--log-format", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("log line should be json"))
        .collect();
    assert!(!lines.is_empty(), "expected log output on stderr");

    let started = lines
        .iter()
        .find(|l| l["fields"]["message"] == "Starting moodiary")
        .expect("startup line logged");
    assert_eq!(started["level"], "INFO");
    assert_eq!(started["span"]["name"], "app_invocation");
    assert!(started["span"]["correlation_id"].is_string());
}

/// Logs go to stderr so stdout stays clean for command output
#[test]
#[serial]
fn test_logs_stay_off_stdout() {
    let temp_dir = tempdir().unwrap();
    base_moodiary_command(temp_dir.path())
        .args(["--verbose", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("No entries yet\n"))
        .stderr(predicate::str::contains("DEBUG"));
}

/// RUST_LOG overrides the verbosity flag
#[test]
#[serial]
fn test_rust_log_overrides_default_level() {
    let temp_dir = tempdir().unwrap();
    base_moodiary_command(temp_dir.path())
        .env("RUST_LOG", "error")
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

/// Errors are logged once and reported on stderr with a non-zero exit
#[test]
#[serial]
fn test_error_is_reported_on_stderr() {
    let temp_dir = tempdir().unwrap();
    base_moodiary_command(temp_dir.path())
        .args(["add", "-m", "😊", "-t", "  ", "-c", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Entry error: Title cannot be empty"));
}
