//! Probe configuration.
//!
//! Built once at startup from the command line and environment, then passed by
//! reference to every stage.

use std::fs;
use std::path::{Path, PathBuf};

use llprobe_find::{EntryKind, PathConfig, Version, VersionRequirement};
use llprobe_flags::{LinkMode, LinkStyle, dedup_ordered};

use crate::Result;

/// Environment variable selecting dynamic linking.
pub const ENV_LINK_DYNAMIC: &str = "LLPROBE_LINK_DYNAMIC";
/// Extra preprocessor tokens merged into the frontend trace.
pub const ENV_CPPFLAGS: &str = "CPPFLAGS";
/// Extra linker tokens merged into the link trace.
pub const ENV_LDFLAGS: &str = "LDFLAGS";

/// Oldest clang / LLVM accepted.
pub const DEFAULT_MIN_VERSION: &str = "6.0.0";

const CLANG_NAMES: &[&str] = &["clang", "clang-*"];
const LLVM_CONFIG_NAMES: &[&str] = &["llvm-config", "llvm-config-*"];
const VERSION_PROBE: &str = "{path} --version";
const CLANG_VERSION_PATTERN: &str = r"clang version\s+(\d+(?:\.\d+)*)";
const LLVM_CONFIG_VERSION_PATTERN: &str = r"^\s*(\d+(?:\.\d+)*)";

/// Fallback directories searched after `PATH`.
const STANDARD_BIN_DIRS: &[&str] = &[
    "/usr/local/opt/llvm/bin",
    "/opt/homebrew/opt/llvm/bin",
    "/usr/local/bin",
    "/usr/bin",
];
/// Parent of versioned Debian-style installs (`/usr/lib/llvm-14/bin`).
const VERSIONED_LLVM_ROOT: &str = "/usr/lib";

/// Which library set to print instead of writing artifacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintLibs {
    Llvm,
    Clang,
}

/// Immutable run configuration.
#[derive(Clone, Debug)]
pub struct ProbeConfig {
    /// Explicit compiler, bypassing the search.
    pub clang: Option<PathBuf>,
    /// Explicit llvm-config, bypassing the search.
    pub llvm_config: Option<PathBuf>,
    pub min_clang_version: String,
    pub min_llvm_version: String,
    /// Directories searched for executables, in order.
    pub search_paths: Vec<PathBuf>,
    pub link_mode: LinkMode,
    pub link_style: LinkStyle,
    /// Extra preprocessor tokens.
    pub extra_cpp_flags: Vec<String>,
    /// Extra linker tokens.
    pub extra_ld_flags: Vec<String>,
    /// Where artifacts are written.
    pub output_dir: PathBuf,
    /// Module name recorded in the test configuration.
    pub module: String,
    /// Print a library set and skip artifact emission.
    pub print: Option<PrintLibs>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            clang: None,
            llvm_config: None,
            min_clang_version: DEFAULT_MIN_VERSION.to_string(),
            min_llvm_version: DEFAULT_MIN_VERSION.to_string(),
            search_paths: Vec::new(),
            link_mode: LinkMode::default(),
            link_style: LinkStyle::host(),
            extra_cpp_flags: Vec::new(),
            extra_ld_flags: Vec::new(),
            output_dir: PathBuf::from("."),
            module: "clang".to_string(),
            print: None,
        }
    }
}

impl ProbeConfig {
    /// Create default options with no search paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus environment inputs from the current process.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults plus environment inputs read through `lookup`.
    #[must_use]
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let link_mode = if lookup(ENV_LINK_DYNAMIC).as_deref().is_some_and(is_truthy) {
            LinkMode::Dynamic
        } else {
            LinkMode::Static
        };
        let split = |key: &str| {
            lookup(key)
                .map(|v| llprobe_find::shell::split(&v))
                .unwrap_or_default()
        };
        Self {
            search_paths: default_search_paths(lookup("PATH").as_deref()),
            link_mode,
            extra_cpp_flags: split(ENV_CPPFLAGS),
            extra_ld_flags: split(ENV_LDFLAGS),
            ..Self::default()
        }
    }

    /// Use an explicit compiler.
    #[must_use]
    pub fn with_clang(mut self, path: impl Into<PathBuf>) -> Self {
        self.clang = Some(path.into());
        self
    }

    /// Use an explicit llvm-config.
    #[must_use]
    pub fn with_llvm_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.llvm_config = Some(path.into());
        self
    }

    /// Set the executable search paths.
    #[must_use]
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Set static or dynamic linking.
    #[must_use]
    pub const fn with_link_mode(mut self, mode: LinkMode) -> Self {
        self.link_mode = mode;
        self
    }

    /// Set how `-l` arguments are grouped.
    #[must_use]
    pub const fn with_link_style(mut self, style: LinkStyle) -> Self {
        self.link_style = style;
        self
    }

    /// Set extra preprocessor and linker tokens.
    #[must_use]
    pub fn with_extra_flags(mut self, cpp: Vec<String>, ld: Vec<String>) -> Self {
        self.extra_cpp_flags = cpp;
        self.extra_ld_flags = ld;
        self
    }

    /// Set the artifact output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the module name.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Print a library set instead of writing artifacts.
    #[must_use]
    pub const fn with_print(mut self, print: Option<PrintLibs>) -> Self {
        self.print = print;
        self
    }

    /// Set the minimum clang and LLVM versions.
    #[must_use]
    pub fn with_min_versions(mut self, clang: &str, llvm: &str) -> Self {
        self.min_clang_version = clang.to_string();
        self.min_llvm_version = llvm.to_string();
        self
    }

    /// Discovery config for the compiler driver.
    ///
    /// # Errors
    /// Returns an error if the version pattern is invalid.
    pub fn clang_search(&self) -> Result<PathConfig> {
        let requirement = VersionRequirement::new(
            &self.min_clang_version,
            VERSION_PROBE,
            CLANG_VERSION_PATTERN,
        )?;
        Ok(self
            .executable_search(self.clang.as_deref(), CLANG_NAMES)
            .with_version(requirement))
    }

    /// Discovery config for llvm-config.
    ///
    /// # Errors
    /// Returns an error if the version pattern is invalid.
    pub fn llvm_config_search(&self) -> Result<PathConfig> {
        let requirement = VersionRequirement::new(
            &self.min_llvm_version,
            VERSION_PROBE,
            LLVM_CONFIG_VERSION_PATTERN,
        )?;
        Ok(self
            .executable_search(self.llvm_config.as_deref(), LLVM_CONFIG_NAMES)
            .with_version(requirement))
    }

    fn executable_search(&self, explicit: Option<&Path>, names: &[&str]) -> PathConfig {
        explicit.map_or_else(
            || {
                PathConfig::new(EntryKind::Executable)
                    .with_names(names.iter().copied())
                    .with_search_paths(self.search_paths.iter().cloned())
            },
            |path| PathConfig::exact(EntryKind::Executable, path),
        )
    }
}

/// Discovery config for the `clang-c/Index.h` parser input.
#[must_use]
pub fn parser_input_search(llvm_include_dir: &Path, include_dirs: &[PathBuf]) -> PathConfig {
    let dirs = std::iter::once(llvm_include_dir)
        .chain(include_dirs.iter().map(PathBuf::as_path))
        .map(|dir| dir.join("clang-c"));
    PathConfig::new(EntryKind::File)
        .with_names(["Index.h"])
        .with_search_paths(dirs)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// `PATH` entries, then the standard install locations, then versioned
/// `/usr/lib/llvm-*/bin` directories newest first.
#[must_use]
pub fn default_search_paths(path_var: Option<&str>) -> Vec<PathBuf> {
    let from_path = path_var
        .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
        .unwrap_or_default();
    let standard = STANDARD_BIN_DIRS.iter().map(PathBuf::from);
    let versioned = versioned_llvm_bins(Path::new(VERSIONED_LLVM_ROOT));
    dedup_ordered(
        from_path
            .into_iter()
            .filter(|p| !p.as_os_str().is_empty())
            .chain(standard)
            .chain(versioned),
    )
}

fn versioned_llvm_bins(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut found: Vec<(Version, PathBuf)> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            let version = Version::parse(name.strip_prefix("llvm-")?);
            Some((version, entry.path().join("bin")))
        })
        .collect();
    found.sort_by(|(a, pa), (b, pb)| b.cmp(a).then_with(|| pa.cmp(pb)));
    found.into_iter().map(|(_, path)| path).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_from_env_defaults() {
        let config = ProbeConfig::from_env_with(env(&[]));
        assert_eq!(config.link_mode, LinkMode::Static);
        assert!(config.extra_cpp_flags.is_empty());
        assert!(config.extra_ld_flags.is_empty());
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(config.search_paths.contains(&PathBuf::from("/usr/bin")));
    }

    #[test]
    fn test_from_env_overrides() {
        let config = ProbeConfig::from_env_with(env(&[
            (ENV_LINK_DYNAMIC, "Yes"),
            (ENV_CPPFLAGS, r#"-I/opt/x -DNAME="a b""#),
            (ENV_LDFLAGS, r"-L/opt/my\ libs"),
            ("PATH", "/opt/llvm/bin:/usr/bin"),
        ]));
        assert_eq!(config.link_mode, LinkMode::Dynamic);
        assert_eq!(config.extra_cpp_flags, vec!["-I/opt/x", r#"-DNAME="a b""#]);
        assert_eq!(config.extra_ld_flags, vec!["-L/opt/my libs"]);
        assert_eq!(config.search_paths[0], PathBuf::from("/opt/llvm/bin"));
        // /usr/bin appears once even though it is both on PATH and standard.
        let usr_bin = config
            .search_paths
            .iter()
            .filter(|p| p.as_path() == Path::new("/usr/bin"))
            .count();
        assert_eq!(usr_bin, 1);
    }

    #[test]
    fn test_link_dynamic_falsey() {
        for value in ["0", "false", "", "off"] {
            let config = ProbeConfig::from_env_with(env(&[(ENV_LINK_DYNAMIC, value)]));
            assert_eq!(config.link_mode, LinkMode::Static, "value {value:?}");
        }
    }

    #[test]
    fn test_explicit_clang_search() {
        let config = ProbeConfig::new().with_clang("/opt/llvm/bin/clang-17");
        let search = config.clang_search().unwrap();
        assert_eq!(search.name_patterns, vec!["clang-17"]);
        assert_eq!(search.search_paths, vec![PathBuf::from("/opt/llvm/bin")]);
        assert!(search.version.is_some());
    }

    #[test]
    fn test_default_searches() {
        let config = ProbeConfig::new().with_search_paths(["/a", "/b"]);
        let clang = config.clang_search().unwrap();
        assert_eq!(clang.name_patterns, vec!["clang", "clang-*"]);
        assert_eq!(clang.search_paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        let llvm = config.llvm_config_search().unwrap();
        assert_eq!(llvm.name_patterns, vec!["llvm-config", "llvm-config-*"]);
        let version = llvm.version.unwrap();
        assert_eq!(version.extract("14.0.6\n").unwrap().to_string(), "14.0.6");
        assert_eq!(version.min_version().to_string(), "6.0.0");
    }

    #[test]
    fn test_versioned_llvm_bins_order() {
        let root = tempfile::tempdir().unwrap();
        for name in ["llvm-9", "llvm-14", "llvm-11", "python3"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        let bins = versioned_llvm_bins(root.path());
        assert_eq!(
            bins,
            vec![
                root.path().join("llvm-14/bin"),
                root.path().join("llvm-11/bin"),
                root.path().join("llvm-9/bin"),
            ]
        );
    }

    #[test]
    fn test_parser_input_search() {
        let search = parser_input_search(Path::new("/llvm/include"), &[PathBuf::from("/sys")]);
        assert_eq!(search.kind, EntryKind::File);
        assert_eq!(
            search.search_paths,
            vec![PathBuf::from("/llvm/include/clang-c"), PathBuf::from("/sys/clang-c")]
        );
    }
}
