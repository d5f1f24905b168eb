//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Build command for the machinedoc-cli binary (finds it in target/debug when run via cargo test).
fn machinedoc_cli() -> Command {
    cargo_bin_cmd!("machinedoc-cli")
}

/// Path to machinedoc library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("machinedoc")
        .join("tests")
        .join("fixtures")
}

/// Docs root and package directory with copies of the fixtures.
fn workspace() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    let packages = dir.path().join("packages");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::create_dir_all(&packages).unwrap();

    let fixtures = fixtures_dir();
    for name in [
        "feather-nrf52840.json",
        "feather-nrf52840.info",
        "broken-board.json",
        "broken-board.info",
    ] {
        std::fs::copy(fixtures.join(name), packages.join(name)).unwrap();
    }
    std::fs::copy(
        fixtures.join("feather-nrf52840.md"),
        docs.join("feather-nrf52840.md"),
    )
    .unwrap();
    (dir, docs, packages)
}

fn offline(cmd: &mut Command, docs: &Path, packages: &Path) {
    cmd.arg("--offline")
        .arg("--docs-root")
        .arg(docs)
        .arg("--packages")
        .arg(packages);
}

#[test]
fn test_cli_help() {
    let mut cmd = machinedoc_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("documentation generator"));
}

#[test]
fn test_cli_version() {
    let mut cmd = machinedoc_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_updates_board() {
    let (_dir, docs, packages) = workspace();
    let mut cmd = machinedoc_cli();

    cmd.arg("generate").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Generating documentation for: feather-nrf52840",
        ));

    let board = std::fs::read_to_string(docs.join("feather-nrf52840.md")).unwrap();
    assert!(board.contains("| PWM       | YES | YES |"));
    assert!(board.contains("| `D0`              | `P0_25`      | `UART_TX_PIN`     |"));
    assert!(docs.join("machine").join("feather-nrf52840.md").exists());
}

#[test]
fn test_cli_generate_skips_missing_board() {
    let (_dir, docs, packages) = workspace();
    let mut cmd = machinedoc_cli();

    cmd.arg("generate").arg("arduino-nano33").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Skipping:                     arduino-nano33"))
        .stdout(predicate::str::contains(
            "Generating documentation for: feather-nrf52840",
        ));
    assert!(!docs.join("machine").join("arduino-nano33.md").exists());
}

#[test]
fn test_cli_generate_reports_load_errors() {
    let (_dir, docs, packages) = workspace();
    std::fs::write(docs.join("broken-board.md"), "## Interfaces\n").unwrap();
    let mut cmd = machinedoc_cli();

    cmd.arg("generate").arg("broken-board").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("undefined: nrf.TWI0"))
        .stderr(predicate::str::contains("undefined: P0_99"))
        .stderr(predicate::str::contains("Error: package machine failed to load (2 errors)"))
        .stdout(predicate::str::contains("feather-nrf52840").not());
}

#[test]
fn test_cli_generate_missing_target_info() {
    let (_dir, docs, packages) = workspace();
    std::fs::remove_file(packages.join("feather-nrf52840.info")).unwrap();
    let mut cmd = machinedoc_cli();

    cmd.arg("generate").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error: could not read target info"));
}

#[test]
fn test_cli_generate_requires_target() {
    let mut cmd = machinedoc_cli();

    cmd.arg("generate");
    cmd.assert().failure();
}

#[test]
fn test_cli_features_human() {
    let (_dir, docs, packages) = workspace();
    let mut cmd = machinedoc_cli();

    cmd.arg("features").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Target: feather-nrf52840"))
        .stdout(predicate::str::contains("PWM        YES"))
        .stdout(predicate::str::contains("SPI        Not yet"))
        .stdout(predicate::str::contains("D3           P1_15    (LED, LED1)"));
}

#[test]
fn test_cli_features_json() {
    let (_dir, docs, packages) = workspace();
    let mut cmd = machinedoc_cli();

    cmd.arg("features")
        .arg("feather-nrf52840")
        .arg("--format")
        .arg("json");
    offline(&mut cmd, &docs, &packages);

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(json["target"], "feather-nrf52840");
    assert_eq!(json["capabilities"]["Bluetooth"], true);
    assert_eq!(json["capabilities"]["USBDevice"], false);
    assert_eq!(json["pins"][0]["hardware_name"], "P0_25");
    assert_eq!(json["pins"][0]["number"], 25);
}

#[test]
fn test_cli_features_leaves_board_untouched() {
    let (_dir, docs, packages) = workspace();
    let before = std::fs::read_to_string(docs.join("feather-nrf52840.md")).unwrap();
    let mut cmd = machinedoc_cli();

    cmd.arg("features").arg("feather-nrf52840");
    offline(&mut cmd, &docs, &packages);

    cmd.assert().success();
    assert_eq!(
        std::fs::read_to_string(docs.join("feather-nrf52840.md")).unwrap(),
        before
    );
}
