// ABOUTME: Integration tests for the gangway CLI commands.
// ABOUTME: Validates --help output, init behavior and serve startup errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn gangway_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("gangway"))
}

#[test]
fn help_shows_commands() {
    gangway_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("gangway.yml");

    gangway_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--endpoint", "http://adapter:8001"])
        .assert()
        .success();

    assert!(config_path.exists(), "gangway.yml should be created");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("endpoint: http://adapter:8001"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("gangway.yml");

    fs::write(&config_path, "existing: config").unwrap();

    gangway_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn serve_without_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    gangway_cmd()
        .current_dir(temp_dir.path())
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn serve_rejects_invalid_adapter_endpoint() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("agent.yml");
    fs::write(&config_path, "adapter:\n  endpoint: ftp://adapter\n").unwrap();

    gangway_cmd()
        .current_dir(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid adapter endpoint"));
}
