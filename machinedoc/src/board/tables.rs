//! Interfaces and Pins table rendering.

use tracing::debug;

use super::ReconcileError;
use crate::features::Capabilities;
use crate::pins::PinEntry;

const INTERFACES_HEADER: &str = "## Interfaces\n\n\
| Interface | Hardware Supported | TinyGo Support |\n\
| --------- | ------------- | ----- |\n";

const PINS_HEADER: &str = "## Pins\n\n\
| Pin               | Hardware pin | Alternative names |\n\
| ----------------- | ------------ | ----------------- |\n";

/// Rebuild the Interfaces section from its previous contents.
///
/// The hardware column is authoritative and copied as is. The software
/// column is only recomputed for rows whose hardware support is not `NO` or
/// `?` and for which a detection rule exists; other rows pass through.
pub fn render_interfaces(previous: &str, capabilities: &Capabilities) -> Result<String, ReconcileError> {
    let mut text = String::from(INTERFACES_HEADER);

    for line in previous.lines() {
        if !line.starts_with("| ") {
            continue;
        }
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() != 5 {
            return Err(ReconcileError::MalformedRow {
                parts: parts.len(),
                line: line.to_string(),
            });
        }
        let interface = parts[1].trim();
        if interface == "Interface" || interface.starts_with('-') {
            continue;
        }
        let hardware = parts[2].trim();
        let mut software = parts[3].trim();
        if hardware != "NO" && hardware != "?" {
            if let Some(supported) = capabilities.lookup(interface) {
                software = if supported { "YES" } else { "Not yet" };
            }
        }
        debug!("Interface {}: hardware {}, software {}", interface, hardware, software);
        text.push_str(&format!(
            "| {:<9} | {:<3} | {:<3} |\n",
            interface, hardware, software
        ));
    }

    Ok(text)
}

/// Render the Pins section. The first board name of each pin goes in the
/// first column, the rest are listed as alternatives.
pub fn render_pins(pins: &[PinEntry]) -> Result<String, ReconcileError> {
    let mut text = String::from(PINS_HEADER);

    for pin in pins {
        if pin.hardware_name.is_empty() {
            return Err(ReconcileError::MissingHardwareName(pin.primary_name().to_string()));
        }
        let alternatives: Vec<String> = pin
            .alternative_names()
            .iter()
            .map(|name| quote(name))
            .collect();
        text.push_str(&format!(
            "| {:<17} | {:<12} | {:<17} |\n",
            quote(pin.primary_name()),
            quote(&pin.hardware_name),
            alternatives.join(", ")
        ));
    }

    Ok(text)
}

fn quote(name: &str) -> String {
    format!("`{}`", name)
}
