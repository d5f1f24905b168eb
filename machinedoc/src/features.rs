//! Capability detection.
//!
//! Whether a chip or board supports an interface is not declared anywhere;
//! it is inferred from what the machine package implements for the target.
//! Every rule is a structural predicate over a [`TypeQuery`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::package::{is_exported, GenDecl, Object, TypeQuery};

/// Build tags of chip families with a Bluetooth radio.
pub const BLUETOOTH_TAGS: &[&str] = &["nrf51", "nrf52", "nrf52840", "nrf52833"];

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("could not find {0} in the package scope")]
    MissingObject(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Capability {
    #[serde(rename = "GPIO")]
    Gpio,
    #[serde(rename = "UART")]
    Uart,
    #[serde(rename = "SPI")]
    Spi,
    #[serde(rename = "I2C")]
    I2c,
    #[serde(rename = "ADC")]
    Adc,
    #[serde(rename = "PWM")]
    Pwm,
    Bluetooth,
    #[serde(rename = "USBDevice")]
    UsbDevice,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::Gpio,
        Capability::Uart,
        Capability::Spi,
        Capability::I2c,
        Capability::Adc,
        Capability::Pwm,
        Capability::Bluetooth,
        Capability::UsbDevice,
    ];

    /// Name as used in the Interfaces table.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::Gpio => "GPIO",
            Capability::Uart => "UART",
            Capability::Spi => "SPI",
            Capability::I2c => "I2C",
            Capability::Adc => "ADC",
            Capability::Pwm => "PWM",
            Capability::Bluetooth => "Bluetooth",
            Capability::UsbDevice => "USBDevice",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Result of one detection pass. Every capability has a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Capabilities {
    flags: BTreeMap<Capability, bool>,
}

impl Capabilities {
    /// Run every detection rule once.
    ///
    /// `variables` are the exported variable groups of the package. PWM
    /// peripherals have board-specific names, so PWM detection scans all of
    /// them linearly instead of looking up a single name.
    pub fn detect<Q>(
        query: &Q,
        variables: &[&GenDecl],
        build_tags: &[String],
    ) -> Result<Self, DetectError>
    where
        Q: TypeQuery + ?Sized,
    {
        let mut flags = BTreeMap::new();

        // `Set` is implemented everywhere, even as a no-op; `Get` is not.
        let pin = require(query, "Pin")?;
        flags.insert(Capability::Gpio, query.lookup_method(&pin.ty, "Get").is_some());

        flags.insert(Capability::Uart, query.lookup("UART").is_some());
        flags.insert(Capability::Spi, query.lookup("SPI").is_some());
        flags.insert(Capability::I2c, query.lookup("I2C").is_some());

        let adc = require(query, "ADC")?;
        flags.insert(Capability::Adc, query.lookup_method(&adc.ty, "Configure").is_some());

        let bluetooth = build_tags
            .iter()
            .any(|tag| BLUETOOTH_TAGS.contains(&tag.as_str()));
        flags.insert(Capability::Bluetooth, bluetooth);

        flags.insert(Capability::UsbDevice, query.lookup("USBDevice").is_some());
        flags.insert(Capability::Pwm, detect_pwm(query, variables)?);

        let capabilities = Self { flags };
        debug!("Detected capabilities: {}", capabilities);
        Ok(capabilities)
    }

    pub fn get(&self, capability: Capability) -> bool {
        self.flags.get(&capability).copied().unwrap_or(false)
    }

    /// Flag for an Interfaces table row name, if a rule exists for it.
    pub fn lookup(&self, name: &str) -> Option<bool> {
        Capability::from_name(name).map(|c| self.get(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Capability, bool)> + '_ {
        self.flags.iter().map(|(c, v)| (*c, *v))
    }

    #[cfg(test)]
    pub(crate) fn from_flags(flags: &[(Capability, bool)]) -> Self {
        let mut all: BTreeMap<Capability, bool> =
            Capability::ALL.into_iter().map(|c| (c, false)).collect();
        all.extend(flags.iter().copied());
        Self { flags: all }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supported: Vec<&str> = self
            .iter()
            .filter(|(_, supported)| *supported)
            .map(|(c, _)| c.name())
            .collect();
        write!(f, "[{}]", supported.join(", "))
    }
}

fn require<'q, Q>(query: &'q Q, name: &str) -> Result<&'q Object, DetectError>
where
    Q: TypeQuery + ?Sized,
{
    query
        .lookup(name)
        .ok_or_else(|| DetectError::MissingObject(name.to_string()))
}

/// True if any exported global has a `Configure` method taking exactly one
/// `PWMConfig` parameter.
fn detect_pwm<Q>(query: &Q, variables: &[&GenDecl]) -> Result<bool, DetectError>
where
    Q: TypeQuery + ?Sized,
{
    let mut found = false;
    for spec in variables.iter().flat_map(|decl| decl.value_specs()) {
        let name = spec.name();
        if !is_exported(name) {
            continue;
        }
        let var = require(query, name)?;
        let Some(configure) = query.lookup_method(&var.ty, "Configure") else {
            continue;
        };
        if configure.params.len() != 1 {
            continue;
        }
        let pwm_config = require(query, "PWMConfig")?;
        if configure.params[0] == pwm_config.ty {
            debug!("{} looks like a PWM peripheral", name);
            found = true;
        }
    }
    Ok(found)
}
