//! machinedoc - reference and board documentation for TinyGo machine packages
//!
//! This library classifies the exported declarations of a target's machine
//! package, detects which peripherals the package implements, resolves pin
//! aliases to hardware pins, and keeps the generated sections of the
//! hand-written board pages in sync.
//!
//! # Quick Start
//!
//! ```no_run
//! use machinedoc::{GeneratorOptions, MachineDocCore};
//!
//! let options = GeneratorOptions::default();
//! if MachineDocCore::has_board_document("pico", &options) {
//!     let summary = MachineDocCore::update_documentation("pico", &options).unwrap();
//!     println!("updated {}", summary.board.display());
//! }
//! ```
//!
//! # Features
//!
//! - **Classification**: exported constants, variables, functions and types with their methods
//! - **Capability detection**: GPIO, UART, SPI, I2C, ADC, PWM, Bluetooth, USBDevice
//! - **Pin resolution**: board pin names grouped by hardware pin
//! - **Reconciliation**: Interfaces and Pins sections rewritten in place, atomically

pub mod board;
pub mod classify;
pub mod core;
pub mod features;
pub mod package;
pub mod pins;
pub mod render;
pub mod toolchain;

// Re-export main types
pub use board::{reconcile, update_board_document, BoardDocument, ReconcileError};
pub use classify::{ClassifyError, PackageDoc, TypeDoc};
pub use crate::core::{DocGenError, FeatureReport, GeneratorOptions, MachineDocCore, UpdateSummary};
pub use features::{Capabilities, Capability, DetectError};
pub use package::{LoadError, Package, PackageLoader, SnapshotLoader, TypeQuery};
pub use pins::{PinEntry, PinError, PinResolver};
pub use render::render_reference;
pub use toolchain::{TargetInfo, TargetInfoError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Capabilities, Capability, DocGenError, FeatureReport, GeneratorOptions, MachineDocCore,
        PinEntry, UpdateSummary,
    };
}
