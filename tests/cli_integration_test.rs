//! Integration tests for the `rbi` binary.

mod common;

use assert_cmd::Command;
use indoc::indoc;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn rbi() -> Command {
    let mut cmd = Command::cargo_bin("rbi").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn test_tmin_prints_rounded_thickness() {
    let mut cmd = rbi();
    cmd.args([
        "tmin",
        "--pressure",
        "2.0",
        "--stress",
        "240",
        "--efficiency",
        "0.85",
        "--diameter",
        "150",
    ]);
    cmd.assert().success();
    assert_eq!(stdout_of(&mut cmd).trim(), "0.739");
}

#[test]
fn test_tmin_rejects_insufficient_strength() {
    rbi()
        .args(["tmin", "--pressure", "2.0", "--stress", "1.0", "--diameter", "150"])
        .assert()
        .code(1);
}

#[test]
fn test_stress_lookup_from_custom_table() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("stress.json");
    fs::write(
        &table,
        indoc! {r#"
            [
                {"material_id": "M-1", "temperature_c": 20.0, "stress_mpa": 250.0},
                {"material_id": "M-1", "temperature_c": 100.0, "stress_mpa": 230.0}
            ]
        "#},
    )
    .unwrap();

    let mut cmd = rbi();
    cmd.arg("stress")
        .args(["--material", "M-1", "--temperature", "60"])
        .arg("--stress-table")
        .arg(&table);
    cmd.assert().success();
    let json: Value = serde_json::from_str(&stdout_of(&mut cmd)).unwrap();
    assert_eq!(json["is_valid_lookup"], true);
    assert_eq!(json["allowable_stress_mpa"], 240.0);
}

#[test]
fn test_stress_lookup_out_of_range_fails() {
    let mut cmd = rbi();
    cmd.args(["stress", "--material", "SA-106-B", "--temperature", "-100"]);
    cmd.assert().code(1);
    let json: Value = serde_json::from_str(&stdout_of(&mut cmd)).unwrap();
    assert_eq!(json["is_valid_lookup"], false);
    assert_eq!(json["allowable_stress_mpa"], 0.0);
}

#[test]
fn test_assess_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets.json");
    let report = dir.path().join("report.json");
    let persist = dir.path().join("results");
    fs::write(&assets, common::asset_array_json(2)).unwrap();

    rbi()
        .current_dir(dir.path())
        .arg("assess")
        .arg(&assets)
        .args(["--format", "json", "--output"])
        .arg(&report)
        .arg("--persist")
        .arg(&persist)
        .assert()
        .success();

    let json: Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["asset_id"], "P-100");
    assert_eq!(json["failures"].as_array().unwrap().len(), 0);
    assert_eq!(fs::read_dir(&persist).unwrap().count(), 2);
}

#[test]
fn test_assess_terminal_summary() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets.json");
    fs::write(&assets, common::CARBON_STEEL_PIPE).unwrap();

    let mut cmd = rbi();
    cmd.current_dir(dir.path()).arg("assess").arg(&assets).arg("--no-parallel");
    cmd.assert().success();
    let out = stdout_of(&mut cmd);
    assert!(out.contains("P-100"));
    assert!(out.contains("1 assessed"));
}

#[test]
fn test_assess_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    rbi()
        .current_dir(dir.path())
        .args(["assess", "does-not-exist.json"])
        .assert()
        .code(1);
}

#[test]
fn test_invalid_config_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets.json");
    let config = dir.path().join("bad.toml");
    fs::write(&assets, common::CARBON_STEEL_PIPE).unwrap();
    fs::write(
        &config,
        indoc! {r#"
            [probability]
            management_systems_factor = -1.0
        "#},
    )
    .unwrap();

    rbi()
        .current_dir(dir.path())
        .arg("assess")
        .arg(&assets)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(3);
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    rbi().current_dir(dir.path()).arg("init").assert().success();

    let contents = fs::read_to_string(dir.path().join(".rbi.toml")).unwrap();
    assert!(contents.contains("[risk_matrix]"));

    rbi().current_dir(dir.path()).arg("init").assert().code(1);
    rbi()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_missing_config_file_exits_with_config_code() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets.json");
    fs::write(&assets, common::CARBON_STEEL_PIPE).unwrap();

    let output = rbi()
        .current_dir(dir.path())
        .arg("assess")
        .arg(&assets)
        .args(["--config", "absent.toml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.toml"));
}
