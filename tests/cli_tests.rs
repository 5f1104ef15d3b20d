//! CLI smoke tests for the islet binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn islet() -> Command {
    Command::cargo_bin("islet").expect("binary builds")
}

#[test]
fn test_help_shows_overview() {
    islet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("overlay"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn test_version() {
    islet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("islet"));
}

#[test]
fn test_completions_bash() {
    islet()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("islet"));
}

#[test]
fn test_completions_invalid_shell_fails() {
    islet()
        .args(["completions", "powershell-ng"])
        .assert()
        .failure();
}

#[test]
fn test_run_rejects_out_of_range_minutes() {
    islet()
        .args(["run", "--minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("minutes"));
}

#[test]
fn test_unknown_subcommand_fails() {
    islet().arg("frobnicate").assert().failure();
}

#[test]
fn test_demo_runs_scripted_session() {
    islet()
        .args(["demo", "--seconds", "1", "--no-sound"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timer:"))
        .stdout(predicate::str::contains("media:"));
}
