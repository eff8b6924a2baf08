//! `llvm-config` queries.

use std::path::{Path, PathBuf};
use std::process::Command;

use llprobe_flags::LinkMode;
use tracing::debug;

use crate::{Error, Result};

/// A resolved `llvm-config` binary.
#[derive(Clone, Debug)]
pub struct LlvmConfig {
    path: PathBuf,
}

/// Everything the pipeline needs from `llvm-config`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LlvmInfo {
    pub version: String,
    pub lib_dir: PathBuf,
    pub include_dir: PathBuf,
    pub cxxflags: String,
    pub ldflags: String,
    pub system_libs: String,
}

impl LlvmInfo {
    /// Text before the first `.` of the version.
    #[must_use]
    pub fn version_major(&self) -> &str {
        self.version.split('.').next().unwrap_or_default()
    }
}

impl LlvmConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `llvm-config <args>` and return trimmed stdout.
    ///
    /// # Errors
    /// Returns `LlvmConfig` if the process cannot be started or exits non-zero.
    pub fn query(&self, args: &[&str]) -> Result<String> {
        let query = args.join(" ");
        debug!(path = %self.path.display(), query = %query, "querying llvm-config");
        let output = Command::new(&self.path)
            .args(args)
            .output()
            .map_err(|e| Error::LlvmConfig {
                query: query.clone(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::LlvmConfig {
                query,
                message: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Collect every value used downstream.
    ///
    /// # Errors
    /// Returns the first failed query.
    pub fn info(&self, mode: LinkMode) -> Result<LlvmInfo> {
        Ok(LlvmInfo {
            version: self.query(&["--version"])?,
            lib_dir: PathBuf::from(self.query(&["--libdir"])?),
            include_dir: PathBuf::from(self.query(&["--includedir"])?),
            cxxflags: self.query(&["--cxxflags"])?,
            ldflags: self.query(&["--ldflags"])?,
            system_libs: self.query(&["--system-libs", mode.llvm_config_flag()])?,
        })
    }
}
