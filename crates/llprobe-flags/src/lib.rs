//! Compiler-output parsing and link-line assembly.
//!
//! - [`probe`] runs the compiler in `-###` mode and turns its last two trace
//!   lines into flag lists and system directories
//! - [`classify`] maps flag tokens to include/library directories
//! - [`libs`] scans directories for `lib<prefix>*.a` / `.so` artifacts
//! - [`link`] turns library names into `-l` arguments

pub mod classify;
pub mod libs;
pub mod link;
pub mod probe;

pub use classify::{FlagDirs, classify};
pub use libs::{LibrarySet, LinkMode, enumerate};
pub use link::{LinkStyle, link_args};
pub use probe::{ParsedFlags, ProbeInput, parse_trace, probe_compiler, split_trace_line};

use std::hash::Hash;
use std::path::PathBuf;

use rustc_hash::FxHashSet;
use thiserror::Error;

/// Flag parsing errors.
#[derive(Error, Debug)]
pub enum FlagsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("probe error: {0}")]
    Probe(#[from] llprobe_find::FindError),
    #[error("{binary}: expected at least 2 lines of -### output, got {lines}")]
    MalformedProbeOutput { binary: PathBuf, lines: usize },
}

pub type Result<T> = std::result::Result<T, FlagsError>;

/// Drop repeated items, keeping the first occurrence of each.
pub fn dedup_ordered<T, I>(items: I) -> Vec<T>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
