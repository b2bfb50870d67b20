#[path = "common/mod.rs"]
mod common;

use std::fs;

use assert_cmd::Command;
use common::{Sandbox, running_as_root};
use predicates::str::contains;
use tempfile::tempdir;

#[test]
fn non_root_exits_with_failure_before_side_effects() {
    if running_as_root() {
        eprintln!("Skipping non_root_exits_with_failure_before_side_effects: running as root");
        return;
    }
    let temp = tempdir().expect("failed to create tempdir");
    let sandbox = Sandbox::new(temp.path());

    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--config")
        .arg(&sandbox.config)
        .assert()
        .failure()
        .stderr(contains("Daemon starting up"))
        .stderr(contains("can only be run by root"));

    assert!(
        !sandbox.pid_file.exists(),
        "PID file must not be created by a refused start"
    );
    assert!(sandbox.helper.exists());
}

#[test]
fn missing_explicit_config_fails() {
    let temp = tempdir().expect("failed to create tempdir");
    let missing = temp.path().join("absent.yaml");

    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--config")
        .arg(&missing)
        .arg("--foreground")
        .assert()
        .failure()
        .stderr(contains("Failed to read config file"));
}

#[test]
fn hold_window_is_not_configurable() {
    let temp = tempdir().expect("failed to create tempdir");
    let config = temp.path().join("config.yaml");
    fs::write(&config, "hold_window: 5\n").expect("failed to write config");

    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--config")
        .arg(&config)
        .arg("--foreground")
        .assert()
        .failure()
        .stderr(contains("Invalid YAML format"));
}
