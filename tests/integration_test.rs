use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Points the binary at a private config file and an API endpoint that
/// refuses connections, so no test touches the network or the real home.
fn incanto(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("incanto").unwrap();
    cmd.env("INCANTO_CONFIG_PATH", config_dir.join("config.json"));
    cmd.env("INCANTO_API_BASE", "http://127.0.0.1:9");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_view_without_file_shows_defaults() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .args(["config", "--view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o-mini"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_config_set_then_view_round_trip() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .args(["config", "--set-api-key", "sk-integration-4321", "--set-model", "gpt-4o"])
        .assert()
        .success()
        .stdout(predicate::str::contains("API key saved"));

    incanto(dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("********4321"))
        .stdout(predicate::str::contains("gpt-4o"))
        .stdout(predicate::str::contains("sk-integration-4321").not());

    let raw = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(saved["apiKey"], "sk-integration-4321");
    assert_eq!(saved["model"], "gpt-4o");
}

#[test]
fn test_missing_api_key_exits_non_zero() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .arg("list files")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--set-api-key"))
        .stdout(predicate::str::contains("[y/N]").not());
}

#[test]
fn test_missing_api_key_checked_before_prompting() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .write_stdin("list files\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("What would you like to do?").not());
}

#[test]
fn test_api_failure_is_reported_and_exits_zero() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .args(["config", "--set-api-key", "sk-unreachable"])
        .assert()
        .success();

    incanto(dir.path())
        .arg("list files")
        .write_stdin("y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to generate commands"))
        .stderr(predicate::str::contains("Completion request failed").not())
        .stdout(predicate::str::contains("No commands were generated"));
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ this is not json").unwrap();

    incanto(dir.path())
        .args(["config", "--view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpt-4o-mini"))
        .stderr(predicate::str::contains("Could not read configuration").count(1))
        .stderr(predicate::str::contains("Failed to read config from").not());
}

#[test]
fn test_verbose_flag_before_config_subcommand() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .args(["-v", "config", "--view"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current configuration"));
}

#[test]
fn test_unwritable_config_path_reports_on_stderr_and_exits_zero() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("incanto").unwrap();
    cmd.env("INCANTO_CONFIG_PATH", dir.path());
    cmd.env_remove("RUST_LOG");

    cmd.args(["config", "--set-api-key", "sk-1234", "--set-model", "gpt-4o"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Failed to save API key").count(1))
        .stderr(predicate::str::contains("Failed to save model").count(1))
        .stdout(predicate::str::contains("Failed to save").not());
}

#[test]
fn test_config_rejects_instruction_arguments() {
    let dir = TempDir::new().unwrap();

    incanto(dir.path())
        .args(["config", "list", "files"])
        .assert()
        .failure();
}
