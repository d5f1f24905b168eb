//! Detect features of a package snapshot and print them.

use machinedoc::prelude::*;
use machinedoc::{PackageDoc, PinResolver, SnapshotLoader, TargetInfo};
use std::path::Path;

fn main() -> Result<(), DocGenError> {
    let mut args = std::env::args().skip(1);
    let snapshot = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/feather-nrf52840.json".to_string());
    let info = args
        .next()
        .unwrap_or_else(|| "tests/fixtures/feather-nrf52840.info".to_string());

    if !Path::new(&snapshot).exists() {
        eprintln!("File not found: {}", snapshot);
        eprintln!("Usage: cargo run --example detect_features [package.json] [target.info]");
        std::process::exit(1);
    }

    let info = TargetInfo::from_file(Path::new(&info))?;
    let package = SnapshotLoader::load_file(Path::new(&snapshot))?;
    package.check_errors()?;

    let doc = PackageDoc::classify(&package.name, &package)?;
    let capabilities = Capabilities::detect(package.query(), &doc.variables, &info.build_tags)?;

    println!("Capabilities of {}:", snapshot);
    for (capability, supported) in capabilities.iter() {
        println!("  {:<9} {}", capability, if supported { "YES" } else { "Not yet" });
    }

    let pins = PinResolver::new(&package.path).resolve(package.query(), &doc.constants)?;
    println!();
    println!("Pins:");
    for pin in &pins {
        println!("  {:<12} {}", pin.hardware_name, pin.other_names.join(", "));
    }

    Ok(())
}
