//! Integration tests for the warfarin-dose binary.
//!
//! These tests verify end-to-end behavior including:
//! - Single calculations in text and JSON form
//! - Validation failures and exit codes
//! - Model listing and description
//! - CSV batch evaluation
//! - Config file handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("warfarin-dose"))
}

/// Temp dir holding an empty config so the user's own config never leaks in
fn setup_config() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    (dir, path)
}

const REFERENCE: &[&str] = &[
    "-f", "age=65",
    "-f", "height=170",
    "-f", "weight=70",
    "-f", "race=white",
    "-f", "cyp2c9=*1/*1",
    "-f", "vkorc1=GG",
];

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warfarin maintenance dose calculator"));
}

#[test]
fn test_calc_text_output() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "gage"])
        .args(REFERENCE)
        .assert()
        .success()
        .stdout(predicate::str::contains("GAGE MODEL"))
        .stdout(predicate::str::contains("5.9 mg/day"))
        .stdout(predicate::str::contains("41.6 mg/week"))
        .stdout(predicate::str::contains("1.82 m²"));
}

#[test]
fn test_calc_json_output() {
    let (_dir, config) = setup_config();

    let output = cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "iwpc", "--json"])
        .args(REFERENCE)
        .output()
        .expect("Failed to run CLI");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is not JSON");
    assert_eq!(value["model"], "iwpc");
    assert_eq!(value["result"]["dailyDose"], 76.3);
    assert_eq!(value["result"]["weeklyDose"], 533.9);
    assert!(value["result"].get("bsa").is_none());
}

#[test]
fn test_calc_biss_two_decimals() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "-m", "biss", "-f", "height=170", "-f", "vkorc1=GG"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.76 mg/day"))
        .stdout(predicate::str::contains("19.33 mg/week"));
}

#[test]
fn test_calc_keeps_trailing_zero() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "xiangya"])
        .args(REFERENCE)
        .assert()
        .success()
        .stdout(predicate::str::contains("3.0 mg/day"))
        .stdout(predicate::str::contains("20.9 mg/week"));
}

#[test]
fn test_calc_rejects_huge_height() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "gage"])
        .args(REFERENCE)
        .args(["-f", "height=1e200"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'height'"))
        .stdout(predicate::str::contains("inf").not());
}

#[test]
fn test_missing_field_names_it_and_fails() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args([
            "calc", "--model", "clover",
            "-f", "age=65",
            "-f", "height=170",
            "-f", "weight=70",
            "-f", "vkorc1=GG",
            "-f", "cyp2c9=*1/*1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gender"))
        .stderr(predicate::str::contains("Please fill in all required fields"));
}

#[test]
fn test_zero_age_rejected() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "xiangya"])
        .args(REFERENCE)
        .args(["-f", "age=0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"));
}

#[test]
fn test_unknown_model_rejected() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "rosendaal"])
        .args(REFERENCE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown model"));
}

#[test]
fn test_malformed_field_argument() {
    cli()
        .args(["calc", "-f", "age65"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name=value"));
}

#[test]
fn test_models_lists_all_five() {
    let (_dir, config) = setup_config();

    let assert = cli()
        .arg("--config")
        .arg(&config)
        .arg("models")
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for id in ["iwpc", "gage", "xiangya", "biss", "clover"] {
        assert!(stdout.contains(id), "missing {} in:\n{}", id, stdout);
    }
}

#[test]
fn test_describe_shows_required_and_defaults() {
    let (_dir, config) = setup_config();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["describe", "biss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("height"))
        .stdout(predicate::str::contains("required"))
        .stdout(predicate::str::contains("optional, default other"))
        .stdout(predicate::str::contains("0 < number <= 300 (cm)"));
}

#[test]
fn test_config_default_model_used() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    fs::write(&config, "[defaults]\nmodel = \"biss\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "-f", "height=170", "-f", "vkorc1=GG"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BISS MODEL"));
}

#[test]
fn test_config_json_format() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");
    fs::write(&config, "[output]\nformat = \"json\"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["calc", "--model", "clover", "-f", "gender=female"])
        .args(REFERENCE)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dailyDose\""));
}

#[test]
fn test_batch_to_file() {
    let (dir, config) = setup_config();
    let input = dir.path().join("patients.csv");
    let output = dir.path().join("results.csv");
    fs::write(
        &input,
        "age,height,weight,vkorc1,cyp2c9\n65,170,70,GG,*1/*1\n,170,70,GG,*1/*1\n",
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["batch", "--model", "xiangya"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 rows"))
        .stderr(predicate::str::contains("1 of 2 rows failed"));

    let written = fs::read_to_string(&output).expect("Failed to read results");
    assert!(written.contains("1,xiangya,3.0,20.9,1.82,"));
    assert!(written.contains("age"));
}

#[test]
fn test_batch_json_stdout() {
    let (dir, config) = setup_config();
    let input = dir.path().join("patients.csv");
    fs::write(&input, "height,vkorc1,indication\n120,AG,fontan\n").unwrap();

    let output = cli()
        .arg("--config")
        .arg(&config)
        .args(["batch", "--model", "biss", "--json"])
        .arg(&input)
        .output()
        .expect("Failed to run CLI");
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // -0.009 + 1.32 + 0.357 = 1.668
    assert_eq!(rows[0]["dailyDose"], 1.67);
    assert_eq!(rows[0]["error"], serde_json::Value::Null);
}
