//! Loaded package representation.
//!
//! Package loading itself (resolving build constraints, type checking) is
//! done by an external loader; this module defines the model it produces
//! and the [`PackageLoader`] seam. [`SnapshotLoader`] reads packages that
//! were dumped to JSON ahead of time.

pub mod ast;
pub mod types;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::toolchain::TargetInfo;

pub use ast::*;
pub use types::*;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("package snapshot not found: {0}")]
    NotFound(PathBuf),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode package snapshot {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Errors reported while loading the package, all of them.
    #[error("package {package} failed to load ({} errors)", .errors.len())]
    Package { package: String, errors: Vec<String> },
}

/// A loaded, type-checked package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Import path, e.g. `machine`.
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    pub scope: Scope,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Package {
    /// Top-level declarations of all files, in file then source order.
    pub fn decls(&self) -> impl Iterator<Item = &Decl> {
        self.files.iter().flat_map(|file| file.decls.iter())
    }

    /// Read-only type query for one detection pass over this package.
    pub fn query(&self) -> &Scope {
        &self.scope
    }

    /// Fail with every load error if the loader reported any.
    pub fn check_errors(&self) -> Result<(), LoadError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(LoadError::Package {
                package: self.path.clone(),
                errors: self.errors.clone(),
            })
        }
    }
}

/// Source of loaded packages for a target.
pub trait PackageLoader {
    fn load(&self, target: &str, info: &TargetInfo) -> Result<Package, LoadError>;
}

/// Loads `<dir>/<target>.json` package snapshots.
pub struct SnapshotLoader {
    dir: PathBuf,
}

impl SnapshotLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn snapshot_path(&self, target: &str) -> PathBuf {
        self.dir.join(format!("{}.json", target))
    }

    pub fn load_file(path: &Path) -> Result<Package, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl PackageLoader for SnapshotLoader {
    fn load(&self, target: &str, info: &TargetInfo) -> Result<Package, LoadError> {
        let path = self.snapshot_path(target);
        debug!(
            "Loading {} for {}/{} with tags {:?}",
            path.display(),
            info.goos,
            info.goarch,
            info.build_tags
        );
        Self::load_file(&path)
    }
}
