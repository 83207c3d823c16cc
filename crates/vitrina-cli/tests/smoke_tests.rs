//! Smoke tests for the vitrina CLI
//!
//! Nothing here starts a browser: `run` is only exercised on paths that fail
//! before a session opens.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A vitrina command with the configuration environment cleared
fn vitrina() -> Command {
    let mut cmd = Command::cargo_bin("vitrina").expect("vitrina binary should exist");
    for key in vitrina::config::env::ALL {
        cmd.env_remove(key);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_flag() {
    vitrina()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    vitrina().assert().failure();
}

#[test]
fn test_run_help_lists_flags() {
    vitrina()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--suite"))
        .stdout(predicate::str::contains("--fail-fast"))
        .stdout(predicate::str::contains("--webdriver-url"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn test_list_shows_every_suite() {
    let assert = vitrina().arg("list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for name in vitrina::suites::names() {
        assert!(stdout.contains(&format!("{name} (")), "missing suite {name}");
    }
    assert!(stdout.contains("smoke::home_page_loads"));
}

#[test]
fn test_list_by_marker() {
    vitrina()
        .args(["list", "--marker", "smoke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[smoke]"))
        .stdout(predicate::str::contains("[feature]").not());
}

#[test]
fn test_list_unknown_marker_fails() {
    vitrina()
        .args(["list", "--marker", "nightly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown marker"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_defaults() {
    vitrina()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL: http://localhost:9002"))
        .stdout(predicate::str::contains("Headless: true"));
}

#[test]
fn test_config_env_then_flags() {
    vitrina()
        .env("BASE_URL", "http://from-env.test")
        .env("BROWSER", "firefox")
        .args(["config", "--headed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL: http://from-env.test"))
        .stdout(predicate::str::contains("Browser: firefox"))
        .stdout(predicate::str::contains("Headless: false"));

    vitrina()
        .env("BASE_URL", "http://from-env.test")
        .args(["config", "--base-url", "http://from-flag.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Base URL: http://from-flag.test"));
}

#[test]
fn test_config_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("vitrina.yaml");
    fs::write(&path, "base_url: http://yaml.test/\nwidth: 375\nheight: 667\n").unwrap();

    vitrina()
        .args(["config", "--json", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"base_url\": \"http://yaml.test\""))
        .stdout(predicate::str::contains("375"));
}

#[test]
fn test_config_bad_env_fails() {
    vitrina()
        .env("EXPLICIT_WAIT", "soon")
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("EXPLICIT_WAIT"));
}

// ============================================================================
// run (argument errors only)
// ============================================================================

#[test]
fn test_run_unknown_suite_fails() {
    vitrina()
        .args(["run", "--suite", "checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown suite 'checkout'"));
}

#[test]
fn test_run_conflicting_head_flags() {
    vitrina()
        .args(["run", "--headless", "--headed"])
        .assert()
        .failure();
}
