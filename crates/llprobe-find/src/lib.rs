//! Toolchain discovery: locate binaries and files by name pattern and search
//! path, gated on a minimum version reported by the candidate itself.

pub mod probe;
mod search;
pub mod shell;
pub mod version;

pub use search::*;
pub use version::{Version, compare, satisfies};

use thiserror::Error;

/// Discovery errors.
#[derive(Error, Debug)]
pub enum FindError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("probe command is empty: {0:?}")]
    EmptyProbeCommand(String),
    #[error("invalid version pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("version pattern {pattern:?} must have exactly one capture group, found {groups}")]
    CaptureGroups { pattern: String, groups: usize },
}

pub type Result<T> = std::result::Result<T, FindError>;
