//! Integration tests for the drain binary.
//!
//! These tests verify end-to-end behavior including:
//! - Adding records and the capacity warning
//! - Input validation
//! - Persistence across invocations
//! - Reset

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI command isolated from the user's config and data
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("drain"));
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .arg("--data-dir")
        .arg(dir.join("data"));
    cmd
}

fn ledger_file(dir: &Path) -> std::path::PathBuf {
    dir.join("data").join("device_data.json")
}

fn add(dir: &Path, name: &str, current: &str, duration: &str) -> assert_cmd::assert::Assert {
    cli(dir)
        .args(["add", "--name", name, "--current", current, "--duration", duration])
        .assert()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("drain"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current consumption calculator"));
}

#[test]
fn test_add_prints_record_and_writes_file() {
    let temp_dir = setup_test_dir();

    add(temp_dir.path(), "MCU", "500", "10")
        .success()
        .stdout(predicate::str::contains(
            "MCU | Current: 500.00 uA | Duration: 10 s | Consumption: 0.001389 mAh",
        ))
        .stdout(predicate::str::contains("exceeded").not());

    let contents = fs::read_to_string(ledger_file(temp_dir.path())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["name"], "MCU");
}

#[test]
fn test_blank_name_is_unknown_device() {
    let temp_dir = setup_test_dir();

    add(temp_dir.path(), "", "500", "10")
        .success()
        .stdout(predicate::str::contains("Unknown Device | Current"));
}

#[test]
fn test_capacity_warning() {
    let temp_dir = setup_test_dir();

    add(temp_dir.path(), "X", "20000000", "3600")
        .success()
        .stdout(predicate::str::contains("Total: 20000.00 mAh / 14000.00 mAh"))
        .stdout(predicate::str::contains("Battery capacity exceeded!"));

    // Record is kept even though it crossed the threshold
    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("X | Current: 20000000.00 uA"));
}

#[test]
fn test_invalid_number_rejected() {
    let temp_dir = setup_test_dir();

    add(temp_dir.path(), "a", "abc", "10")
        .failure()
        .stderr(predicate::str::contains("valid number"));

    add(temp_dir.path(), "a", "100", "-5")
        .failure()
        .stderr(predicate::str::contains("non-negative"));

    assert!(!ledger_file(temp_dir.path()).exists());
}

#[test]
fn test_total_persists_across_runs() {
    let temp_dir = setup_test_dir();

    // 1 A for 30 min, twice
    add(temp_dir.path(), "a", "1000000", "1800").success();
    add(temp_dir.path(), "b", "1000000", "1800").success();

    cli(temp_dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("1000.00 mAh / 14000.00 mAh"))
        .stdout(predicate::str::contains("Devices:   2"))
        .stdout(predicate::str::contains("Remaining: 13000.00 mAh"));
}

#[test]
fn test_list_preserves_order() {
    let temp_dir = setup_test_dir();

    for name in ["first", "second", "third"] {
        add(temp_dir.path(), name, "100", "60").success();
    }

    let output = cli(temp_dir.path()).arg("list").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let names: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split(" | ").next())
        .filter(|n| ["first", "second", "third"].contains(n))
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn test_reset_deletes_file() {
    let temp_dir = setup_test_dir();

    add(temp_dir.path(), "a", "100", "60").success();
    assert!(ledger_file(temp_dir.path()).exists());

    cli(temp_dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 records removed"));
    assert!(!ledger_file(temp_dir.path()).exists());

    cli(temp_dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No devices logged."));
}

#[test]
fn test_reset_without_file_is_noop() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path()).arg("reset").assert().success();
}

#[test]
fn test_default_command_is_status() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00 mAh / 14000.00 mAh"));
}

#[test]
fn test_capacity_from_config() {
    let temp_dir = setup_test_dir();
    let config_dir = temp_dir.path().join("config/drain");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[battery]\ncapacity_mah = 500.0\n").unwrap();

    add(temp_dir.path(), "a", "1000000", "3600")
        .success()
        .stdout(predicate::str::contains("/ 500.00 mAh"))
        .stdout(predicate::str::contains("Battery capacity exceeded!"));
}
