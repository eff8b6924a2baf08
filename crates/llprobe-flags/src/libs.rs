//! Native library enumeration.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

/// Static or dynamic linkage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkMode {
    #[default]
    Static,
    Dynamic,
}

impl LinkMode {
    /// File suffix of libraries for this mode. Versioned `.so.N` names are not recognized.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Static => ".a",
            Self::Dynamic => ".so",
        }
    }

    /// `llvm-config` flag selecting this mode.
    #[must_use]
    pub const fn llvm_config_flag(self) -> &'static str {
        match self {
            Self::Static => "--link-static",
            Self::Dynamic => "--link-shared",
        }
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for LinkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "dynamic" | "shared" => Ok(Self::Dynamic),
            _ => Err(format!("unknown link mode: {s}")),
        }
    }
}

/// Libraries found by a scan, with what was scanned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibrarySet {
    /// Canonical names (`clangAST` for `libclangAST.a`), sorted.
    pub names: BTreeSet<String>,
    /// Directories scanned.
    pub dirs: Vec<PathBuf>,
    /// Linkage the names were collected for.
    pub mode: LinkMode,
}

impl LibrarySet {
    /// Scan `dirs` for `lib<prefix>*` libraries of the given mode.
    #[must_use]
    pub fn scan(dirs: &[PathBuf], prefix: &str, mode: LinkMode) -> Self {
        Self {
            names: enumerate(dirs, prefix, mode),
            dirs: dirs.to_vec(),
            mode,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Canonical names of `lib<prefix>*.a` (static) or `lib<prefix>*.so`
/// (dynamic) files across `dirs`.
#[must_use]
pub fn enumerate(dirs: &[PathBuf], prefix: &str, mode: LinkMode) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for dir in dirs {
        names.extend(scan_dir(dir, prefix, mode));
    }
    debug!(prefix, %mode, count = names.len(), "enumerated libraries");
    names
}

fn scan_dir(dir: &Path, prefix: &str, mode: LinkMode) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        debug!(dir = %dir.display(), "cannot read library directory");
        return Vec::new();
    };
    let lead = format!("lib{prefix}");
    entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter_map(|file| canonical_name(&file, &lead, mode.suffix()))
        .collect()
}

/// `libclangAST.a` → `clangAST` when it matches `lib<prefix>*<suffix>`.
fn canonical_name(file: &str, lead: &str, suffix: &str) -> Option<String> {
    if !file.starts_with(lead) {
        return None;
    }
    let stem = file.strip_suffix(suffix)?;
    // Guard against the suffix overlapping the prefix (`lib.a` for an empty prefix).
    if stem.len() < lead.len() {
        return None;
    }
    stem.strip_prefix("lib").map(str::to_string)
}
