use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn help_describes_the_daemon() {
    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--foreground"))
        .stdout(contains("--config"))
        .stdout(contains("--log-level"));
}

#[test]
fn version_flag_prints_package_version() {
    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_log_level_is_rejected_by_the_parser() {
    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .args(["--log-level", "loud"])
        .assert()
        .failure()
        .stderr(contains("invalid log level 'loud'"));
}

#[test]
fn unknown_flags_are_rejected() {
    Command::new(assert_cmd::cargo::cargo_bin!("buttonshutdown-daemon"))
        .arg("--hold-seconds=5")
        .assert()
        .failure();
}
