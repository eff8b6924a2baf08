//! Flag classification.
//!
//! A single left-to-right scan over driver tokens. Each recognized flag shape
//! has one entry in [`RULES`]; everything else is ignored.

use std::path::PathBuf;

/// Include and library directories named by flags, in first-seen order.
///
/// Not yet deduplicated or checked for existence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagDirs {
    pub include_dirs: Vec<PathBuf>,
    pub lib_dirs: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// Every following token not starting with `-` is a system include dir.
    IsystemRun,
    /// `<dir>` → `<dir>/../../../include`.
    ResourceDir,
    /// `<path>` → prefix before the first `/lib/`, plus `/lib/`.
    LtoLibrary,
    /// Joined `-L<dir>`.
    LibPath,
}

#[derive(Clone, Copy, Debug)]
enum Shape {
    Exact(&'static str),
    Prefix(&'static str),
}

struct Rule {
    shape: Shape,
    action: Action,
}

const RULES: &[Rule] = &[
    Rule {
        shape: Shape::Exact("-internal-isystem"),
        action: Action::IsystemRun,
    },
    Rule {
        shape: Shape::Exact("-resource-dir"),
        action: Action::ResourceDir,
    },
    Rule {
        shape: Shape::Exact("-lto_library"),
        action: Action::LtoLibrary,
    },
    Rule {
        shape: Shape::Prefix("-L"),
        action: Action::LibPath,
    },
];

/// Find the rule for `token`, returning the text after a prefix match.
fn lookup(token: &str) -> Option<(Action, &str)> {
    RULES.iter().find_map(|rule| match rule.shape {
        Shape::Exact(flag) => (token == flag).then_some((rule.action, "")),
        Shape::Prefix(prefix) => token.strip_prefix(prefix).map(|rest| (rule.action, rest)),
    })
}

/// Classify `tokens` into include and library directories.
#[must_use]
pub fn classify<S: AsRef<str>>(tokens: &[S]) -> FlagDirs {
    let mut dirs = FlagDirs::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_ref();
        i += 1;
        let Some((action, rest)) = lookup(token) else {
            continue;
        };
        match action {
            Action::IsystemRun => {
                while let Some(dir) = tokens.get(i).map(AsRef::as_ref) {
                    if dir.starts_with('-') {
                        break;
                    }
                    dirs.include_dirs.push(PathBuf::from(dir));
                    i += 1;
                }
            }
            Action::ResourceDir => {
                if let Some(dir) = tokens.get(i).map(AsRef::as_ref) {
                    dirs.include_dirs
                        .push(PathBuf::from(format!("{dir}/../../../include")));
                    i += 1;
                }
            }
            Action::LtoLibrary => {
                if let Some(path) = tokens.get(i).map(AsRef::as_ref) {
                    if let Some(idx) = path.find("/lib/") {
                        dirs.lib_dirs.push(PathBuf::from(format!("{}/lib/", &path[..idx])));
                    }
                    i += 1;
                }
            }
            Action::LibPath => {
                // A detached `-L <dir>` never appears in driver traces.
                if !rest.is_empty() {
                    dirs.lib_dirs.push(PathBuf::from(with_trailing_slash(rest)));
                }
            }
        }
    }
    dirs
}

fn with_trailing_slash(dir: &str) -> String {
    if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(v: &[&str]) -> Vec<PathBuf> {
        v.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_isystem_run_stops_at_flag() {
        let dirs = classify(&["-internal-isystem", "/x/y", "-other"]);
        assert_eq!(dirs.include_dirs, paths(&["/x/y"]));
        assert!(dirs.lib_dirs.is_empty());
    }

    #[test]
    fn test_isystem_run_takes_every_plain_token() {
        let dirs = classify(&[
            "-internal-isystem",
            "/a",
            "/b",
            "-internal-externc-isystem",
            "/c",
            "-internal-isystem",
            "/d",
        ]);
        assert_eq!(dirs.include_dirs, paths(&["/a", "/b", "/d"]));
    }

    #[test]
    fn test_resource_dir() {
        let dirs = classify(&["-resource-dir", "/usr/lib/llvm-14/lib/clang/14.0.0", "-v"]);
        assert_eq!(
            dirs.include_dirs,
            paths(&["/usr/lib/llvm-14/lib/clang/14.0.0/../../../include"])
        );
    }

    #[test]
    fn test_resource_dir_consumes_next() {
        // The consumed operand is not classified again even if it looks like a flag.
        let dirs = classify(&["-resource-dir", "-L/weird", "-L/real"]);
        assert_eq!(dirs.lib_dirs, paths(&["/real/"]));
    }

    #[test]
    fn test_lto_library() {
        let dirs = classify(&[
            "-lto_library",
            "/Library/Developer/CommandLineTools/usr/lib/libLTO.dylib",
        ]);
        assert_eq!(
            dirs.lib_dirs,
            paths(&["/Library/Developer/CommandLineTools/usr/lib/"])
        );
    }

    #[test]
    fn test_lto_library_without_lib_segment() {
        let dirs = classify(&["-lto_library", "/opt/libLTO.dylib", "-L/x"]);
        assert_eq!(dirs.lib_dirs, paths(&["/x/"]));
    }

    #[test]
    fn test_lib_path_trailing_slash() {
        let dirs = classify(&["-L/usr/lib", "-L/usr/local/lib/", "-L", "-lfoo"]);
        assert_eq!(dirs.lib_dirs, paths(&["/usr/lib/", "/usr/local/lib/"]));
    }

    #[test]
    fn test_unrecognized_ignored() {
        let dirs = classify(&["-cc1", "-triple", "x86_64-pc-linux-gnu", "/tmp/probe.cpp"]);
        assert_eq!(dirs, FlagDirs::default());
    }
}
