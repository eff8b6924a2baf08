//! llprobe - toolchain probe for clang-based binding builds
//!
//! Locates `clang` and `llvm-config` (version-gated), runs the compiler in
//! `-###` mode to learn its system include and library directories,
//! enumerates the clang and LLVM libraries available for linking, and writes
//! the header, make variables, and test configuration the downstream build
//! reads.
//!
//! # Example
//!
//! ```ignore
//! use llprobe::{ProbeConfig, pipeline};
//!
//! let config = ProbeConfig::from_env().with_output_dir("build");
//! let written = pipeline::run(&config)?;
//! ```

// Re-export from sub-crates
pub use llprobe_emit::{Artifacts, BuildVars, TestConfig, Written, write_if_changed};
pub use llprobe_find::{EntryKind, FindError, Found, PathConfig, Version, VersionRequirement, locate};
pub use llprobe_flags::{FlagsError, LibrarySet, LinkMode, LinkStyle, ParsedFlags, link_args};

pub mod config;
pub mod llvm;
pub mod pipeline;
pub mod platform;

pub use config::{PrintLibs, ProbeConfig};

use std::path::PathBuf;

use thiserror::Error;

/// Probe errors. All of them end the run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{tool} not found (searched {} directories)", .searched.len())]
    ToolNotFound {
        tool: String,
        searched: Vec<PathBuf>,
        hint: String,
    },
    #[error("no {mode} lib{prefix}* libraries in {}", display_dirs(.dirs))]
    EmptyLibrarySet {
        prefix: String,
        mode: LinkMode,
        dirs: Vec<PathBuf>,
        hint: String,
    },
    #[error("llvm-config {query} failed: {message}")]
    LlvmConfig { query: String, message: String },
    #[error(transparent)]
    Find(#[from] FindError),
    #[error(transparent)]
    Flags(#[from] FlagsError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Install guidance for errors caused by a missing toolchain.
    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::ToolNotFound { hint, .. } | Self::EmptyLibrarySet { hint, .. } => Some(hint),
            _ => None,
        }
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "(no directories)".to_string();
    }
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
