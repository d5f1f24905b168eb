//! Target information reported by the compiler toolchain.
//!
//! `tinygo info <target>` prints `key: value` lines. Only the build tags,
//! GOOS, GOARCH and the cached GOROOT are needed here.

use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TargetInfoError {
    #[error("could not run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} info {target} failed: {stderr}")]
    Failed {
        command: String,
        target: String,
        stderr: String,
    },

    #[error("could not read target info {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not find all needed properties (build tags, GOOS, GOARCH, GOROOT)")]
    MissingProperties,
}

/// Build configuration of one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    pub build_tags: Vec<String>,
    pub goos: String,
    pub goarch: String,
    pub goroot: String,
}

impl TargetInfo {
    /// Parse a `key: value` report. Lines without a colon are ignored; every
    /// needed property must be present and non-empty.
    pub fn parse(report: &str) -> Result<Self, TargetInfoError> {
        let mut build_tags = Vec::new();
        let mut goos = String::new();
        let mut goarch = String::new();
        let mut goroot = String::new();

        for line in report.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "build tags" => {
                    build_tags = value.split_whitespace().map(str::to_string).collect();
                }
                "GOOS" => goos = value.to_string(),
                "GOARCH" => goarch = value.to_string(),
                "cached GOROOT" => goroot = value.to_string(),
                _ => {}
            }
        }

        if build_tags.is_empty() || goos.is_empty() || goarch.is_empty() || goroot.is_empty() {
            return Err(TargetInfoError::MissingProperties);
        }

        Ok(Self {
            build_tags,
            goos,
            goarch,
            goroot,
        })
    }

    /// Run `<toolchain> info <target>` and parse its report.
    pub fn query(toolchain: &str, target: &str) -> Result<Self, TargetInfoError> {
        debug!("Running {} info {}", toolchain, target);
        let output = Command::new(toolchain)
            .arg("info")
            .arg(target)
            .output()
            .map_err(|source| TargetInfoError::Spawn {
                command: toolchain.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(TargetInfoError::Failed {
                command: toolchain.to_string(),
                target: target.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Self::parse(&String::from_utf8_lossy(&output.stdout))
    }

    /// Read a previously captured report from disk.
    pub fn from_file(path: &Path) -> Result<Self, TargetInfoError> {
        let report = std::fs::read_to_string(path).map_err(|source| TargetInfoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&report)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.build_tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
LLVM triple:       thumbv7em-unknown-unknown-eabi
GOOS:              linux
GOARCH:            arm
build tags:        cortexm baremetal linux arm nrf52840 nrf feather_nrf52840 tinygo math_big_pure_go gc.conservative scheduler.tasks serial.usb
garbage collector: conservative
scheduler:         tasks
cached GOROOT:     /home/user/.cache/tinygo/goroot-1234
";

    #[test]
    fn test_parse_report() {
        let info = TargetInfo::parse(REPORT).unwrap();
        assert_eq!(info.goos, "linux");
        assert_eq!(info.goarch, "arm");
        assert_eq!(info.goroot, "/home/user/.cache/tinygo/goroot-1234");
        assert_eq!(info.build_tags.len(), 12);
        assert!(info.has_tag("nrf52840"));
        assert!(!info.has_tag("nrf52"));
    }

    #[test]
    fn test_missing_goroot_is_fatal() {
        let report = REPORT.replace("cached GOROOT", "GOROOT");
        assert!(matches!(
            TargetInfo::parse(&report),
            Err(TargetInfoError::MissingProperties)
        ));
    }

    #[test]
    fn test_empty_build_tags_is_fatal() {
        let report = "GOOS: linux\nGOARCH: arm\nbuild tags:\ncached GOROOT: /x\n";
        assert!(TargetInfo::parse(report).is_err());
    }

    #[test]
    fn test_missing_toolchain() {
        let err = TargetInfo::query("definitely-not-a-toolchain-binary", "pca10040").unwrap_err();
        assert!(matches!(err, TargetInfoError::Spawn { .. }));
    }
}
