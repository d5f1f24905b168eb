//! Board document reconciliation.
//!
//! Board pages are written by hand, except for two sections kept in sync
//! with the machine package: "Interfaces" (which peripherals the chip has
//! and which are implemented) and "Pins" (board pin names and the hardware
//! pins behind them). Only those sections are rewritten; everything else in
//! the document is preserved byte for byte.

pub mod section;
pub mod tables;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::features::Capabilities;
use crate::pins::{PinEntry, PinError};

pub use section::{find_section, replace_section};
pub use tables::{render_interfaces, render_pins};

pub const INTERFACES_SECTION: &str = "Interfaces";
pub const PINS_SECTION: &str = "Pins";

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("could not find '{0}' header")]
    MissingSection(String),

    #[error("expected 5 parts, got {parts}: {line}")]
    MalformedRow { parts: usize, line: String },

    #[error("could not find hardware pin name for {0}")]
    MissingHardwareName(String),

    #[error(transparent)]
    Pins(#[from] PinError),

    #[error("could not read Markdown file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write updated Markdown file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not rename updated Markdown file {path}: {source}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A board page held in memory while its generated sections are replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardDocument {
    text: String,
}

impl BoardDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn read(path: &Path) -> Result<Self, ReconcileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ReconcileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn has_section(&self, name: &str) -> bool {
        find_section(&self.text, name).is_some()
    }

    /// Regenerate the mandatory Interfaces section.
    pub fn update_interfaces(&mut self, capabilities: &Capabilities) -> Result<(), ReconcileError> {
        let range = find_section(&self.text, INTERFACES_SECTION)
            .ok_or_else(|| ReconcileError::MissingSection(INTERFACES_SECTION.to_string()))?;
        let interfaces = render_interfaces(&self.text[range.clone()], capabilities)?;
        self.text = replace_section(&self.text, range, &interfaces);
        Ok(())
    }

    /// Regenerate the Pins section if the document has one. Returns whether
    /// it did; `pins` is only called when the section exists.
    pub fn update_pins<F>(&mut self, pins: F) -> Result<bool, ReconcileError>
    where
        F: FnOnce() -> Result<Vec<PinEntry>, PinError>,
    {
        let Some(range) = find_section(&self.text, PINS_SECTION) else {
            warn!("No {} section, leaving pins alone", PINS_SECTION);
            return Ok(false);
        };
        let table = render_pins(&pins()?)?;
        self.text = replace_section(&self.text, range, &table);
        Ok(true)
    }

    /// Replace the file at `path` with this document.
    pub fn write(&self, path: &Path) -> Result<(), ReconcileError> {
        write_atomic(path, &self.text)
    }
}

/// Apply detected capabilities and pins to a board page.
pub fn reconcile<F>(text: &str, capabilities: &Capabilities, pins: F) -> Result<String, ReconcileError>
where
    F: FnOnce() -> Result<Vec<PinEntry>, PinError>,
{
    let mut document = BoardDocument::new(text);
    document.update_interfaces(capabilities)?;
    document.update_pins(pins)?;
    Ok(document.into_text())
}

/// Read, reconcile and atomically rewrite the board page at `path`.
pub fn update_board_document<F>(path: &Path, capabilities: &Capabilities, pins: F) -> Result<(), ReconcileError>
where
    F: FnOnce() -> Result<Vec<PinEntry>, PinError>,
{
    let mut document = BoardDocument::read(path)?;
    document.update_interfaces(capabilities)?;
    let pins_updated = document.update_pins(pins)?;
    document.write(path)?;
    info!(
        "Updated {} (pins {})",
        path.display(),
        if pins_updated { "updated" } else { "absent" }
    );
    Ok(())
}

/// `<path>.tmp`, next to the target so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `contents` to a temporary file beside `path`, then rename it over
/// `path`. Readers of `path` see either the old or the new document.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ReconcileError> {
    let tmp = temp_path(path);
    std::fs::write(&tmp, contents).map_err(|source| ReconcileError::Write {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| ReconcileError::Rename {
        path: path.to_path_buf(),
        source,
    })
}
