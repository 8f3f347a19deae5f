//! End-to-end CLI tests.
//!
//! These run the binary offline: every scenario stops before the first
//! request to the API.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Builds a command running in `dir` without ambient credentials.
fn branchnet(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_branchnet"));
    cmd.current_dir(dir.path())
        .env_remove("GITHUB_USER")
        .env_remove("GITHUB_TOKEN")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    branchnet(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mine"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    branchnet(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("branchnet "));
}

#[test]
fn test_mine_rejects_invalid_locator() {
    let dir = TempDir::new().unwrap();
    branchnet(&dir)
        .args(["mine", "not-a-repository"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid repository"));
}

#[test]
fn test_batch_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    branchnet(&dir)
        .args(["batch", "absent.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_batch_with_only_malformed_rows() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("repos.csv"), "onlyonecolumn\na,b,c\n").unwrap();

    branchnet(&dir)
        .args(["batch", "repos.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No repository to mine (2 lines skipped)"));

    assert!(!dir.path().join("Results").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("branchnet.toml"),
        "[github]\nper_page = 0\n",
    )
    .unwrap();

    branchnet(&dir)
        .args(["mine", "openp2pdesign/network"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();
    branchnet(&dir)
        .args(["--config", "missing.toml", "mine", "openp2pdesign/network"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load missing.toml"));
}

#[test]
fn test_resolve_empty_list_writes_empty_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("repos.csv"), "onlyonecolumn\n").unwrap();

    branchnet(&dir)
        .args(["resolve", "repos.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolved 0 of 0 repositories"));

    let output = fs::read_to_string(dir.path().join("reposoutput.csv")).unwrap();
    assert!(output.is_empty());
}
