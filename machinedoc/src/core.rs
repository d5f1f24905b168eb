//! Per-target documentation pipeline shared by the CLI and the example.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::board::{update_board_document, ReconcileError};
use crate::classify::{ClassifyError, PackageDoc};
use crate::features::{Capabilities, DetectError};
use crate::package::{LoadError, Package, PackageLoader, SnapshotLoader};
use crate::pins::{PinEntry, PinError, PinResolver, NO_PIN};
use crate::render::render_reference;
use crate::toolchain::{TargetInfo, TargetInfoError};

#[derive(Debug, thiserror::Error)]
pub enum DocGenError {
    #[error(transparent)]
    TargetInfo(#[from] TargetInfoError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Classify(#[from] ClassifyError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Pins(#[from] PinError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocGenError {
    /// Individual load errors, when the package failed to load.
    pub fn load_errors(&self) -> &[String] {
        match self {
            DocGenError::Load(LoadError::Package { errors, .. }) => errors,
            _ => &[],
        }
    }
}

/// Options for a generation run.
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    /// Root of the microcontroller reference docs.
    pub docs_root: PathBuf,
    /// Compiler command queried for target info.
    pub toolchain: String,
    /// Directory with `<target>.json` package snapshots.
    pub packages_dir: PathBuf,
    /// Read `<target>.info` from `packages_dir` instead of running the toolchain.
    pub offline: bool,
    pub pin_type: String,
    pub sentinel: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("../content/docs/reference/microcontrollers"),
            toolchain: "tinygo".to_string(),
            packages_dir: PathBuf::from("packages"),
            offline: false,
            pin_type: "Pin".to_string(),
            sentinel: NO_PIN.to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Hand-written board page, `<docs-root>/<target>.md`.
    pub fn board_doc_path(&self, target: &str) -> PathBuf {
        self.docs_root.join(format!("{}.md", target))
    }

    /// Generated reference page, `<docs-root>/machine/<target>.md`.
    pub fn reference_path(&self, target: &str) -> PathBuf {
        self.docs_root.join("machine").join(format!("{}.md", target))
    }

    pub fn info_path(&self, target: &str) -> PathBuf {
        self.packages_dir.join(format!("{}.info", target))
    }
}

/// Capabilities and pins of one target, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub target: String,
    pub capabilities: Capabilities,
    pub pins: Vec<PinEntry>,
}

/// Where an update wrote its output.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSummary {
    pub reference: PathBuf,
    pub board: PathBuf,
}

pub struct MachineDocCore;

impl MachineDocCore {
    pub fn has_board_document(target: &str, options: &GeneratorOptions) -> bool {
        options.board_doc_path(target).exists()
    }

    pub fn target_info(target: &str, options: &GeneratorOptions) -> Result<TargetInfo, DocGenError> {
        let info = if options.offline {
            TargetInfo::from_file(&options.info_path(target))?
        } else {
            TargetInfo::query(&options.toolchain, target)?
        };
        debug!(
            "Target {}: GOOS={} GOARCH={} tags={:?}",
            target, info.goos, info.goarch, info.build_tags
        );
        Ok(info)
    }

    /// Query target info and load the package, failing on any load error.
    pub fn load_package(target: &str, options: &GeneratorOptions) -> Result<(TargetInfo, Package), DocGenError> {
        let info = Self::target_info(target, options)?;
        let loader = SnapshotLoader::new(&options.packages_dir);
        let package = Self::load_with(&loader, target, &info)?;
        Ok((info, package))
    }

    pub fn load_with<L>(loader: &L, target: &str, info: &TargetInfo) -> Result<Package, DocGenError>
    where
        L: PackageLoader + ?Sized,
    {
        let package = loader.load(target, info)?;
        package.check_errors()?;
        Ok(package)
    }

    /// Regenerate the reference page and reconcile the board page of `target`.
    pub fn update_documentation(target: &str, options: &GeneratorOptions) -> Result<UpdateSummary, DocGenError> {
        let (info, package) = Self::load_package(target, options)?;
        Self::update_from_package(target, &info, &package, options)
    }

    /// Same as [`Self::update_documentation`] for an already loaded package.
    pub fn update_from_package(
        target: &str,
        info: &TargetInfo,
        package: &Package,
        options: &GeneratorOptions,
    ) -> Result<UpdateSummary, DocGenError> {
        let doc = PackageDoc::classify(target, package)?;

        let reference = options.reference_path(target);
        write_reference(&reference, &render_reference(&doc))?;
        info!("Wrote {}", reference.display());

        let capabilities = Capabilities::detect(package.query(), &doc.variables, &info.build_tags)?;
        let resolver = PinResolver::with_names(&package.path, &options.pin_type, &options.sentinel);
        let board = options.board_doc_path(target);
        update_board_document(&board, &capabilities, || {
            resolver.resolve(package.query(), &doc.constants)
        })?;

        Ok(UpdateSummary { reference, board })
    }

    /// Detect capabilities and resolve pins without touching any document.
    pub fn report(target: &str, options: &GeneratorOptions) -> Result<FeatureReport, DocGenError> {
        let (info, package) = Self::load_package(target, options)?;
        Self::report_from_package(target, &info, &package, options)
    }

    pub fn report_from_package(
        target: &str,
        info: &TargetInfo,
        package: &Package,
        options: &GeneratorOptions,
    ) -> Result<FeatureReport, DocGenError> {
        let doc = PackageDoc::classify(target, package)?;
        let capabilities = Capabilities::detect(package.query(), &doc.variables, &info.build_tags)?;
        let resolver = PinResolver::with_names(&package.path, &options.pin_type, &options.sentinel);
        let pins = resolver.resolve(package.query(), &doc.constants)?;
        Ok(FeatureReport {
            target: target.to_string(),
            capabilities,
            pins,
        })
    }
}

fn write_reference(path: &Path, contents: &str) -> Result<(), DocGenError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DocGenError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, contents).map_err(|source| DocGenError::Io {
        path: path.to_path_buf(),
        source,
    })
}
