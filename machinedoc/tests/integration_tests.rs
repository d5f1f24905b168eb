//! Integration tests for the machinedoc pipeline

use machinedoc::prelude::*;
use machinedoc::{DocGenError, LoadError, PackageDoc, PinResolver, SnapshotLoader, TargetInfo};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TARGET: &str = "feather-nrf52840";

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Temporary docs root and package directory populated from the fixtures.
fn workspace(target: &str) -> (TempDir, GeneratorOptions) {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    let packages = dir.path().join("packages");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::create_dir_all(&packages).unwrap();

    copy(&fixture_path(&format!("{}.json", target)), &packages);
    copy(&fixture_path(&format!("{}.info", target)), &packages);
    let board = fixture_path(&format!("{}.md", target));
    if board.exists() {
        copy(&board, &docs);
    }

    let options = GeneratorOptions {
        docs_root: docs,
        packages_dir: packages,
        offline: true,
        ..GeneratorOptions::default()
    };
    (dir, options)
}

fn copy(file: &Path, dir: &Path) {
    std::fs::copy(file, dir.join(file.file_name().unwrap())).unwrap();
}

#[test]
fn test_load_snapshot() {
    let package = SnapshotLoader::load_file(&fixture_path("feather-nrf52840.json")).unwrap();
    assert_eq!(package.path, "machine");
    assert_eq!(package.files.len(), 3);
    assert!(package.check_errors().is_ok());
}

#[test]
fn test_classify_fixture() {
    let package = SnapshotLoader::load_file(&fixture_path("feather-nrf52840.json")).unwrap();
    let doc = PackageDoc::classify(TARGET, &package).unwrap();

    let types: Vec<&str> = doc.types.keys().map(String::as_str).collect();
    assert_eq!(
        types,
        vec!["ADC", "ADCConfig", "I2C", "I2CConfig", "PWM", "PWMConfig", "Pin", "UART", "UARTConfig"]
    );
    assert_eq!(doc.funcs.keys().collect::<Vec<_>>(), vec!["CPUFrequency"]);
    assert_eq!(doc.constants.len(), 6);
    assert_eq!(doc.variables.len(), 1);

    let pin_methods: Vec<&str> = doc.types["Pin"].methods.keys().map(String::as_str).collect();
    assert_eq!(pin_methods, vec!["Get", "Set"]);
    assert!(doc.types.values().all(|t| !t.methods.contains_key("Start")));
}

#[test]
fn test_detect_fixture_capabilities() {
    let info = TargetInfo::from_file(&fixture_path("feather-nrf52840.info")).unwrap();
    let package = SnapshotLoader::load_file(&fixture_path("feather-nrf52840.json")).unwrap();
    let doc = PackageDoc::classify(TARGET, &package).unwrap();

    let caps = Capabilities::detect(package.query(), &doc.variables, &info.build_tags).unwrap();
    assert!(caps.get(Capability::Gpio));
    assert!(caps.get(Capability::Uart));
    assert!(!caps.get(Capability::Spi));
    assert!(caps.get(Capability::I2c));
    assert!(caps.get(Capability::Adc));
    assert!(caps.get(Capability::Pwm));
    assert!(caps.get(Capability::Bluetooth));
    assert!(!caps.get(Capability::UsbDevice));
}

#[test]
fn test_resolve_fixture_pins() {
    let package = SnapshotLoader::load_file(&fixture_path("feather-nrf52840.json")).unwrap();
    let doc = PackageDoc::classify(TARGET, &package).unwrap();
    let pins = PinResolver::new("machine")
        .resolve(package.query(), &doc.constants)
        .unwrap();

    let rows: Vec<(u64, &str, Vec<&str>)> = pins
        .iter()
        .map(|p| {
            (
                p.number,
                p.hardware_name.as_str(),
                p.other_names.iter().map(String::as_str).collect(),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (25, "P0_25", vec!["D0", "UART_TX_PIN"]),
            (24, "P0_24", vec!["D1", "UART_RX_PIN"]),
            (47, "P1_15", vec!["D3", "LED", "LED1"]),
            (41, "P1_09", vec!["D13"]),
            (42, "P1_10", vec!["LED2"]),
        ]
    );
    // P0_06 has no board name.
    assert!(pins.iter().all(|p| p.hardware_name != "P0_06"));
}

#[test]
fn test_update_documentation() {
    let (_dir, options) = workspace(TARGET);
    assert!(MachineDocCore::has_board_document(TARGET, &options));

    let summary = MachineDocCore::update_documentation(TARGET, &options).unwrap();
    assert_eq!(summary.board, options.board_doc_path(TARGET));

    let board = std::fs::read_to_string(&summary.board).unwrap();
    assert!(board.contains("| GPIO      | YES | YES |\n"));
    assert!(board.contains("| SPI       | YES | Not yet |\n"));
    assert!(board.contains("| I2C       | YES | YES |\n"));
    assert!(board.contains("| PWM       | YES | YES |\n"));
    assert!(board.contains("| USBDevice | YES | Not yet |\n"));
    assert!(board.contains("| Bluetooth | YES | YES |\n"));
    assert!(board.contains("| CAN       | NO  | ?   |\n"));
    assert!(board.contains("| `D3`              | `P1_15`      | `LED`, `LED1`     |\n"));
    assert!(board.contains("| `LED2`            | `P1_10`      |                   |\n"));
    assert!(board.starts_with("---\ntitle: \"Adafruit Feather nRF52840 Express\"\nweight: 3\n---\n"));
    assert!(board.contains("\n## Machine Package Docs\n"));
    assert!(board.ends_with("tinygo flash -target=feather-nrf52840 [PATH TO YOUR PROGRAM]\n```\n"));
    assert!(!options.docs_root.join("feather-nrf52840.md.tmp").exists());

    let reference = std::fs::read_to_string(&summary.reference).unwrap();
    assert!(reference.starts_with("---\ntitle: feather-nrf52840\n---\n"));
    assert!(reference.contains("\n## Constants\n"));
    assert!(reference.contains("```go\nconst Device = \"nrf52840\"\n```\nDevice is the running program's chip name.\n"));
    assert!(reference.contains("### func CPUFrequency\n\n```go\nfunc CPUFrequency() uint32\n```\n"));
    assert!(reference.contains("### func (*PWM) Configure\n\n```go\nfunc (pwm *PWM) Configure(config PWMConfig) error\n```\n"));
    assert!(reference.contains("## type PWMConfig\n\n```go\ntype PWMConfig struct {\n\tPeriod uint64\n}\n```\n"));
    assert!(!reference.contains("Start"));
    assert!(!reference.contains("initUSB"));
    assert!(!reference.contains("errI2CBusError"));
}

#[test]
fn test_update_documentation_is_idempotent() {
    let (_dir, options) = workspace(TARGET);
    let summary = MachineDocCore::update_documentation(TARGET, &options).unwrap();
    let board = std::fs::read_to_string(&summary.board).unwrap();
    let reference = std::fs::read_to_string(&summary.reference).unwrap();

    MachineDocCore::update_documentation(TARGET, &options).unwrap();
    assert_eq!(std::fs::read_to_string(&summary.board).unwrap(), board);
    assert_eq!(std::fs::read_to_string(&summary.reference).unwrap(), reference);
}

#[test]
fn test_report_does_not_write() {
    let (_dir, options) = workspace(TARGET);
    let before = std::fs::read_to_string(options.board_doc_path(TARGET)).unwrap();

    let report = MachineDocCore::report(TARGET, &options).unwrap();
    assert_eq!(report.target, TARGET);
    assert!(report.capabilities.get(Capability::Pwm));
    assert_eq!(report.pins.len(), 5);

    assert_eq!(std::fs::read_to_string(options.board_doc_path(TARGET)).unwrap(), before);
    assert!(!options.reference_path(TARGET).exists());
}

#[test]
fn test_package_load_errors_are_aggregated() {
    let (_dir, options) = workspace("broken-board");
    let err = MachineDocCore::update_documentation("broken-board", &options).unwrap_err();

    assert!(matches!(err, DocGenError::Load(LoadError::Package { .. })));
    assert_eq!(
        err.load_errors(),
        &[
            "machine_nrf.go:12:2: undefined: nrf.TWI0".to_string(),
            "board_feather-nrf52840.go:7:8: undefined: P0_99".to_string(),
        ]
    );
    assert!(!options.reference_path("broken-board").exists());
}

#[test]
fn test_missing_snapshot() {
    let (_dir, mut options) = workspace(TARGET);
    options.packages_dir = options.packages_dir.join("nowhere");
    std::fs::create_dir_all(&options.packages_dir).unwrap();
    std::fs::copy(
        fixture_path("feather-nrf52840.info"),
        options.packages_dir.join("feather-nrf52840.info"),
    )
    .unwrap();

    let err = MachineDocCore::update_documentation(TARGET, &options).unwrap_err();
    assert!(matches!(err, DocGenError::Load(LoadError::NotFound(_))));
}

#[test]
fn test_missing_board_document() {
    let (_dir, options) = workspace("broken-board");
    assert!(!MachineDocCore::has_board_document("broken-board", &options));
}
