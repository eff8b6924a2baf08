//! Host detection for install hints.

use std::collections::BTreeMap;
use std::fs;

const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Parsed `os-release` file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OsRelease {
    fields: BTreeMap<String, String>,
}

impl OsRelease {
    /// Parse `KEY=value` lines; quotes around values are stripped, comments
    /// and malformed lines ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let fields = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| {
                let value = value.trim();
                let value = value
                    .strip_prefix('"')
                    .and_then(|v| v.strip_suffix('"'))
                    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                    .unwrap_or(value);
                (key.trim().to_string(), value.to_string())
            })
            .collect();
        Self { fields }
    }

    /// Read the host's `os-release`, if any.
    #[must_use]
    pub fn detect() -> Option<Self> {
        OS_RELEASE_PATHS
            .iter()
            .find_map(|path| fs::read_to_string(path).ok())
            .map(|text| Self::parse(&text))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// `ID` followed by every `ID_LIKE` entry.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.get("ID")
            .into_iter()
            .chain(self.get("ID_LIKE").into_iter().flat_map(str::split_whitespace))
            .collect()
    }
}

/// Package manager used in install hints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Brew,
}

impl PackageManager {
    /// Pick a package manager for the host.
    #[must_use]
    pub fn for_host(os: Option<&OsRelease>) -> Option<Self> {
        if cfg!(target_os = "macos") {
            return Some(Self::Brew);
        }
        os?.ids().into_iter().find_map(|id| match id {
            "debian" | "ubuntu" => Some(Self::Apt),
            "fedora" | "rhel" | "centos" => Some(Self::Dnf),
            "arch" => Some(Self::Pacman),
            _ => None,
        })
    }

    /// Command installing clang, llvm-config, and the development libraries.
    #[must_use]
    pub const fn install_command(self) -> &'static str {
        match self {
            Self::Apt => "apt install llvm-dev libclang-dev clang",
            Self::Dnf => "dnf install llvm-devel clang-devel",
            Self::Pacman => "pacman -S llvm clang",
            Self::Brew => "brew install llvm",
        }
    }
}

/// Remediation text for a missing toolchain.
#[must_use]
pub fn install_hint(os: Option<&OsRelease>) -> String {
    PackageManager::for_host(os).map_or_else(
        || {
            "install clang and the LLVM development libraries, or pass --clang/--llvm-config"
                .to_string()
        },
        |pm| format!("try `{}`, or pass --clang/--llvm-config", pm.install_command()),
    )
}
