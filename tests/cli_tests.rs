use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use std::fs;

// Nothing listens on the discard port, so connections are refused immediately
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

fn setup_test_env(rc: Option<&str>) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    if let Some(content) = rc {
        let config_dir = temp_dir.path().join(".stagectl");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("rc"), content).unwrap();
    }
    temp_dir
}

fn get_cmd(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stagectl").unwrap();
    cmd.env("HOME", temp_dir.path())
        .env_remove("STAGECTL_RC")
        .env_remove("STAGECTL_API_URL")
        .env_remove("STAGECTL_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stages"))
        .stdout(predicate::str::contains("statuses"));
}

#[test]
fn test_stage_help_lists_moves() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .args(["stages", "p1", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("up"))
        .stdout(predicate::str::contains("down"));
}

#[test]
fn test_invalid_priority_rejected_before_fetch() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .args(["--api-url", UNREACHABLE_API, "stages", "p1", "add", "Design", "--priority", "urgent"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Invalid priority"))
        .stderr(predicate::str::contains("loading").not());
}

#[test]
fn test_invalid_date_rejected_before_fetch() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .args(["--api-url", UNREACHABLE_API, "stages", "p1", "modify", "5", "--start", "someday"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_blank_project_rejected() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .args(["stages", " ", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Project identifier cannot be empty"));
}

#[test]
fn test_bad_rc_file_is_user_error() {
    let temp_dir = setup_test_env(Some("api.timeout=soon\n"));
    get_cmd(&temp_dir)
        .arg("statuses")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("api.timeout"));
}

#[test]
fn test_invalid_api_url_is_internal_error() {
    let temp_dir = setup_test_env(None);
    get_cmd(&temp_dir)
        .args(["--api-url", "not a url", "statuses"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::starts_with("Internal error:"));
}

#[test]
fn test_unreachable_backend_reports_loading_error() {
    let temp_dir = setup_test_env(Some(&format!("api.url={}\n", UNREACHABLE_API)));
    get_cmd(&temp_dir)
        .args(["stages", "p1", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error while loading stages"))
        .stderr(predicate::str::contains("Loading stages...").not());
}
