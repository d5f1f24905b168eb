//! Pin name resolution.
//!
//! A pin number usually has several names: the name defined by the chip
//! (`PB02`, `P0_13`, `GPIO5`) and names defined by the board (`D13`, `LED`,
//! `SDA_PIN`). This module works out, for every pin number a board names,
//! which name is the hardware one and which are aliases.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

use crate::package::{is_exported, GenDecl, Initializer, TypeQuery, TypeRef, ValueSpec};

/// Name of the constant that means "no pin".
pub const NO_PIN: &str = "NoPin";

#[derive(Debug, Error)]
pub enum PinError {
    #[error("could not find constant {0} in the package scope")]
    MissingObject(String),

    #[error("expected pin {name} with value {value} to be representable by uint64")]
    NotRepresentable { name: String, value: String },

    #[error("could not find {0} constant")]
    MissingSentinel(String),

    #[error("duplicate hardware pin name: {first} and {second}")]
    DuplicateHardwareName { first: String, second: String },

    #[error("could not find hardware pin name for {0}")]
    MissingHardwareName(String),

    #[error("unrecognized initializer for pin {name}: {expr}")]
    UnrecognizedInitializer { name: String, expr: String },
}

/// One row of the Pins table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinEntry {
    pub number: u64,
    pub hardware_name: String,
    /// Board names in declaration order. Never empty.
    pub other_names: Vec<String>,
}

impl PinEntry {
    /// The name shown in the first column.
    pub fn primary_name(&self) -> &str {
        self.other_names.first().map(String::as_str).unwrap_or_default()
    }

    pub fn alternative_names(&self) -> &[String] {
        self.other_names.get(1..).unwrap_or(&[])
    }
}

/// Matches chip-level pin names:
/// - `PA0` (AVR), `PA00` (Microchip SAM)
/// - `P0_00` (nRF)
/// - `GPIO0` (ESP, RP2040)
/// - `P00` (SiFive)
fn hardware_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(P[A-Z][0-9]+|P[0-1]_[0-9]{2}|GPIO[0-9]+|P[0-9]{2})$")
            .expect("Valid regex")
    })
}

/// Whether a pin constant is defined by the chip rather than the board.
///
/// `PB02 = portB + 2` and `GPIO1` inside an `iota` sequence are chip names.
/// `PA10 = PB02` only refers to one, so it is a board name.
pub fn is_hardware_pin(spec: &ValueSpec) -> Result<bool, PinError> {
    let name = spec.name();
    if !hardware_name_pattern().is_match(name) {
        return Ok(false);
    }
    match spec.initializer() {
        Initializer::Implicit
        | Initializer::Literal
        | Initializer::Binary
        | Initializer::Iota => Ok(true),
        Initializer::Reference(_) => Ok(false),
        Initializer::Unrecognized(expr) => Err(PinError::UnrecognizedInitializer {
            name: name.to_string(),
            expr: expr.to_string(),
        }),
    }
}

#[derive(Default)]
struct PinBuilder {
    number: u64,
    hardware_name: Option<String>,
    other_names: Vec<String>,
}

/// Resolves pin constants of one package into [`PinEntry`] rows.
pub struct PinResolver {
    pin_type: TypeRef,
    sentinel: String,
}

impl PinResolver {
    /// Resolver for `<package>.Pin` constants with `NoPin` as sentinel.
    pub fn new(package: &str) -> Self {
        Self::with_names(package, "Pin", NO_PIN)
    }

    pub fn with_names(package: &str, pin_type: &str, sentinel: &str) -> Self {
        Self {
            pin_type: TypeRef::named(package, pin_type),
            sentinel: sentinel.to_string(),
        }
    }

    /// Resolve the exported constant groups of a package.
    ///
    /// Only pin numbers with at least one board name are returned, in the
    /// order in which they got their first board name.
    pub fn resolve<Q>(&self, query: &Q, constants: &[&GenDecl]) -> Result<Vec<PinEntry>, PinError>
    where
        Q: TypeQuery + ?Sized,
    {
        let mut named: Vec<(&str, u64, bool)> = Vec::new();
        for spec in constants.iter().flat_map(|decl| decl.value_specs()) {
            let name = spec.name();
            if !is_exported(name) {
                continue;
            }
            let object = query
                .lookup(name)
                .ok_or_else(|| PinError::MissingObject(name.to_string()))?;
            if object.ty != self.pin_type {
                continue;
            }
            let number = object
                .value
                .as_ref()
                .and_then(|value| value.as_u64())
                .ok_or_else(|| PinError::NotRepresentable {
                    name: name.to_string(),
                    value: object
                        .value
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "<none>".to_string()),
                })?;
            named.push((name, number, is_hardware_pin(spec)?));
        }

        let no_pin = named
            .iter()
            .find(|(name, _, _)| *name == self.sentinel)
            .map(|(_, number, _)| *number)
            .ok_or_else(|| PinError::MissingSentinel(self.sentinel.clone()))?;

        let mut builders: Vec<PinBuilder> = Vec::new();
        let mut by_number: HashMap<u64, usize> = HashMap::new();
        let mut exposed: Vec<usize> = Vec::new();

        for (name, number, hardware) in named {
            if name == self.sentinel || number == no_pin {
                continue;
            }
            let index = *by_number.entry(number).or_insert_with(|| {
                builders.push(PinBuilder {
                    number,
                    ..PinBuilder::default()
                });
                builders.len() - 1
            });
            let pin = &mut builders[index];
            if hardware {
                if let Some(first) = &pin.hardware_name {
                    return Err(PinError::DuplicateHardwareName {
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
                pin.hardware_name = Some(name.to_string());
            } else {
                if pin.other_names.is_empty() {
                    exposed.push(index);
                }
                pin.other_names.push(name.to_string());
            }
        }

        let mut entries = Vec::with_capacity(exposed.len());
        for index in exposed {
            let pin = std::mem::take(&mut builders[index]);
            let hardware_name = pin
                .hardware_name
                .ok_or_else(|| PinError::MissingHardwareName(pin.other_names[0].clone()))?;
            entries.push(PinEntry {
                number: pin.number,
                hardware_name,
                other_names: pin.other_names,
            });
        }
        debug!("Resolved {} board pins", entries.len());
        Ok(entries)
    }
}
