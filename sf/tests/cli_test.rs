//! Command-line tests for the headless `sf` subcommands

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// `sf` pointed at an isolated config and data dir
fn sf(temp: &Path) -> Command {
    let config = temp.join("skillfolio.yml");
    if !config.exists() {
        fs::write(&config, "log-level: debug\n").unwrap();
    }
    let mut cmd = cargo_bin_cmd!("sf");
    cmd.env("NO_COLOR", "1")
        .arg("-c")
        .arg(&config)
        .arg("--data-dir")
        .arg(temp.join("data"));
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = cargo_bin_cmd!("sf");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("skills"))
        .stdout(predicate::str::contains("gauge"))
        .stdout(predicate::str::contains("--data-dir"));
}

#[test]
fn test_skills_list_seeds_defaults() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust"))
        .stdout(predicate::str::contains("Terminal UIs"))
        .stdout(predicate::str::contains("Testing"));

    let store = fs::read_to_string(temp.path().join("data").join("store.json")).unwrap();
    assert!(store.contains("skillsData"));
    assert!(temp.path().join("data").join("logs").join("skillfolio.log").exists());
}

#[test]
fn test_skills_add_then_list() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["skills", "add", "--title", "  Go  ", "--description", "  Goroutines  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added skill #4"));

    sf(temp.path())
        .args(["skills", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "Go""#))
        .stdout(predicate::str::contains(r#""description": "Goroutines""#));
}

#[test]
fn test_skills_add_blank_is_silent() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["skills", "add", "--title", "   ", "--description", "x"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    sf(temp.path())
        .args(["skills", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title": "   ""#).not());
}

#[test]
fn test_gauge_set_and_show() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["gauge", "set", "rust", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("average 63%"))
        .stdout(predicate::str::contains("Getting there..."));

    sf(temp.path())
        .args(["gauge", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"))
        .stdout(predicate::str::contains("63%"));
}

#[test]
fn test_gauge_show_json() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["gauge", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""average": 50"#))
        .stdout(predicate::str::contains(r#""level": "Getting there...""#));
}

#[test]
fn test_gauge_set_unknown_slider_fails() {
    let temp = TempDir::new().unwrap();
    sf(temp.path())
        .args(["gauge", "set", "cobol", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown slider"));
}

#[test]
fn test_corrupt_store_is_recovered() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("store.json"), "{not json").unwrap();

    sf(temp.path())
        .args(["skills", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rust"));
    assert!(data.join("store.json.corrupt").exists());
}
