//! End-to-end tests for the bump binary
//!
//! These tests verify:
//! - Exit codes for fatal and non-fatal situations
//! - The CLI surface (--help, --version)
//! - JSON output schema on an empty workspace
//!
//! None of them reach a registry: every workspace here has no manifests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn bump() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bump"));
    cmd.env_remove("BUMP_BASE_DIR").env("NO_COLOR", "1");
    cmd
}

/// A base directory holding one empty git repository
fn empty_workspace() -> TempDir {
    let temp = tempfile::tempdir().expect("Failed to create temp directory");
    fs::create_dir_all(temp.path().join("empty/.git")).unwrap();
    temp
}

#[test]
fn test_help_lists_phase_flags() {
    bump()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--unsafe"))
        .stdout(predicate::str::contains("--no-pull"))
        .stdout(predicate::str::contains("--no-install"))
        .stdout(predicate::str::contains("--no-commit"))
        .stdout(predicate::str::contains("--no-push"));
}

#[test]
fn test_version() {
    bump()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_repository_fails() {
    let temp = empty_workspace();
    bump()
        .args(["--base-dir", temp.path().to_str().unwrap(), "missing", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid git repository"));
}

#[test]
fn test_directory_without_git_is_rejected() {
    let temp = empty_workspace();
    fs::create_dir(temp.path().join("plain")).unwrap();
    bump()
        .args(["--base-dir", temp.path().to_str().unwrap(), "plain"])
        .assert()
        .failure();
}

#[test]
fn test_unreadable_base_dir_fails() {
    let temp = empty_workspace();
    let missing = temp.path().join("nope");
    bump()
        .args(["--base-dir", missing.to_str().unwrap(), "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_empty_dry_run_succeeds() {
    let temp = empty_workspace();
    bump()
        .args(["--base-dir", temp.path().to_str().unwrap(), "--dry-run", "--no-pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(dry-run)"))
        .stdout(predicate::str::contains("Total:          0"));
}

#[test]
fn test_base_dir_from_environment() {
    let temp = empty_workspace();
    bump()
        .env("BUMP_BASE_DIR", temp.path())
        .args(["empty", "--dry-run"])
        .assert()
        .success();
}

#[test]
fn test_json_output_schema() {
    let temp = empty_workspace();
    let output = bump()
        .args(["--base-dir", temp.path().to_str().unwrap(), "--dry-run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["repositories"], serde_json::json!(["empty"]));
    assert_eq!(json["summary"]["total"], 0);
    assert!(json["generated_at"].is_string());
    assert!(json["applied"].as_array().unwrap().is_empty());
}

#[test]
fn test_quiet_prints_counts_only() {
    let temp = empty_workspace();
    bump()
        .args(["--base-dir", temp.path().to_str().unwrap(), "--dry-run", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary:"))
        .stdout(predicate::str::contains("Everything is up to date").not());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    bump().args(["--verbose", "--quiet"]).assert().failure();
}
