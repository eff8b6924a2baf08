//! Name-pattern, search-path, and version-gated discovery.
//!
//! Search paths form the outer loop and name patterns the inner loop, so a
//! match in an earlier directory always wins over a better pattern later on.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, trace};

use crate::version::Version;
use crate::{FindError, Result, probe};

/// What kind of filesystem entry a search accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file with an execute bit set.
    #[default]
    Executable,
    /// Any regular file.
    File,
}

/// Minimum-version constraint checked by running the candidate.
#[derive(Clone, Debug)]
pub struct VersionRequirement {
    min_version: Version,
    probe_command: String,
    extraction: Regex,
}

impl VersionRequirement {
    /// Create a requirement.
    ///
    /// `probe_command` must contain [`probe::PATH_PLACEHOLDER`]; `extraction`
    /// must have exactly one capture group.
    ///
    /// # Errors
    /// Returns an error if the pattern does not compile or has the wrong
    /// number of capture groups.
    pub fn new(min_version: &str, probe_command: &str, extraction: &str) -> Result<Self> {
        let regex = Regex::new(extraction)?;
        // captures_len counts the implicit whole-match group.
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(FindError::CaptureGroups {
                pattern: extraction.to_string(),
                groups,
            });
        }
        Ok(Self {
            min_version: Version::parse(min_version),
            probe_command: probe_command.to_string(),
            extraction: regex,
        })
    }

    /// Minimum accepted version.
    #[must_use]
    pub const fn min_version(&self) -> &Version {
        &self.min_version
    }

    /// Pull the version out of probe output.
    #[must_use]
    pub fn extract(&self, output: &str) -> Option<Version> {
        self.extraction
            .captures(output)
            .and_then(|caps| caps.get(1))
            .map(|m| Version::parse(m.as_str()))
    }

    /// Run the probe for `candidate` and report its version if it qualifies.
    fn check(&self, candidate: &Path) -> Option<Version> {
        let output = match probe::run_template(&self.probe_command, candidate) {
            Ok(output) => output,
            Err(e) => {
                debug!(path = %candidate.display(), error = %e, "version probe failed");
                return None;
            }
        };
        let Some(version) = self.extract(&output) else {
            debug!(path = %candidate.display(), "no version in probe output");
            return None;
        };
        if version.satisfies(&self.min_version) {
            Some(version)
        } else {
            debug!(
                path = %candidate.display(),
                version = %version,
                min = %self.min_version,
                "candidate too old"
            );
            None
        }
    }
}

/// One name pattern: an exact file name or a prefix with a trailing `*`.
#[derive(Clone, Debug, PartialEq, Eq)]
enum NamePattern {
    Exact(String),
    Prefix(String),
}

impl NamePattern {
    fn parse(pattern: &str) -> Self {
        pattern.strip_suffix('*').map_or_else(
            || Self::Exact(pattern.to_string()),
            |prefix| Self::Prefix(prefix.to_string()),
        )
    }

    /// Entries in `dir` matching this pattern.
    ///
    /// Wildcard matches are ordered newest first by the version in their suffix
    /// (`clang-18` before `clang-9`), ties broken by name, so the result does
    /// not depend on directory iteration order.
    fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        match self {
            Self::Exact(name) => {
                let path = dir.join(name);
                if path.exists() { vec![path] } else { Vec::new() }
            }
            Self::Prefix(prefix) => {
                let Ok(entries) = fs::read_dir(dir) else {
                    return Vec::new();
                };
                let mut matches: Vec<(Version, String)> = entries
                    .filter_map(std::result::Result::ok)
                    .filter_map(|entry| entry.file_name().into_string().ok())
                    .filter_map(|name| {
                        let version = Version::parse(name.strip_prefix(prefix.as_str())?);
                        Some((version, name))
                    })
                    .collect();
                matches.sort_by(|(va, na), (vb, nb)| vb.cmp(va).then_with(|| na.cmp(nb)));
                matches.into_iter().map(|(_, name)| dir.join(name)).collect()
            }
        }
    }
}

/// Discovery configuration for a single tool or file.
#[derive(Clone, Debug, Default)]
pub struct PathConfig {
    /// Accepted entry kind.
    pub kind: EntryKind,
    /// Name patterns, tried in order within each search path.
    pub name_patterns: Vec<String>,
    /// Directories, tried in order.
    pub search_paths: Vec<PathBuf>,
    /// Optional minimum version.
    pub version: Option<VersionRequirement>,
}

impl PathConfig {
    /// Create an empty config for the given entry kind.
    #[must_use]
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Set the name patterns.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_patterns = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the search paths.
    #[must_use]
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Require a minimum version.
    #[must_use]
    pub fn with_version(mut self, requirement: VersionRequirement) -> Self {
        self.version = Some(requirement);
        self
    }

    /// Search restricted to exactly one file (used for explicit `--clang PATH` style overrides).
    #[must_use]
    pub fn exact(kind: EntryKind, path: &Path) -> Self {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(kind).with_names([name]).with_search_paths([dir])
    }
}

/// A located entry and the version it reported, if one was required.
#[derive(Clone, Debug)]
pub struct Found {
    pub path: PathBuf,
    pub version: Option<Version>,
}

/// Find the first entry satisfying `config`.
///
/// Absence is not an error; the caller decides whether it is fatal.
#[must_use]
pub fn locate(config: &PathConfig) -> Option<Found> {
    let patterns: Vec<NamePattern> = config
        .name_patterns
        .iter()
        .map(|p| NamePattern::parse(p))
        .collect();

    for dir in &config.search_paths {
        for pattern in &patterns {
            for candidate in pattern.candidates(dir) {
                trace!(path = %candidate.display(), "considering candidate");
                if !has_kind(&candidate, config.kind) {
                    debug!(path = %candidate.display(), kind = ?config.kind, "wrong entry kind");
                    continue;
                }
                let version = match &config.version {
                    Some(requirement) => match requirement.check(&candidate) {
                        Some(v) => Some(v),
                        None => continue,
                    },
                    None => None,
                };
                debug!(path = %candidate.display(), "found");
                return Some(Found {
                    path: candidate,
                    version,
                });
            }
        }
    }
    None
}

fn has_kind(path: &Path, kind: EntryKind) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    match kind {
        EntryKind::File => true,
        EntryKind::Executable => is_executable(&meta),
    }
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
const fn is_executable(_meta: &fs::Metadata) -> bool {
    true
}
