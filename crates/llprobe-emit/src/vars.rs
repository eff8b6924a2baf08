//! Make-style variable definitions consumed by the binding build.
//!
//! Keys and their order are fixed; the downstream makefile includes this file
//! verbatim.

use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

pub const KEY_CLANG: &str = "CLANG";
pub const KEY_CLANG_INCLUDE_FLAGS: &str = "CLANG_INCLUDE_FLAGS";
pub const KEY_CLANG_LIBS: &str = "CLANG_LIBS";
pub const KEY_LLVM_CONFIG: &str = "LLVM_CONFIG";
pub const KEY_LLVM_VERSION_MAJOR: &str = "LLVM_VERSION_MAJOR";
pub const KEY_LLVM_VERSION: &str = "LLVM_VERSION";
pub const KEY_LLVM_CXXFLAGS: &str = "LLVM_CXXFLAGS";
pub const KEY_LLVM_LDFLAGS: &str = "LLVM_LDFLAGS";
pub const KEY_LLVM_LIBS: &str = "LLVM_LIBS";

/// Values for the variable-definition file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildVars {
    /// Compiler driver.
    pub clang: PathBuf,
    /// System include directories; rendered as `-isystem <dir>` pairs.
    pub include_dirs: Vec<PathBuf>,
    /// Every link argument needed for a clang tool: clang libs, LLVM libs, system libs.
    pub clang_libs: Vec<String>,
    pub llvm_config: PathBuf,
    pub version_major: String,
    pub version: String,
    pub cxxflags: String,
    pub ldflags: String,
    /// LLVM library arguments only.
    pub llvm_libs: Vec<String>,
}

impl BuildVars {
    /// `-isystem <dir>` for every include directory.
    #[must_use]
    pub fn include_flags(&self) -> String {
        self.include_dirs
            .iter()
            .map(|dir| format!("-isystem {}", dir.display()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Generate the variable-definition file.
#[must_use]
pub fn gen_vars(vars: &BuildVars) -> String {
    let entries = [
        (KEY_CLANG, vars.clang.display().to_string()),
        (KEY_CLANG_INCLUDE_FLAGS, vars.include_flags()),
        (KEY_CLANG_LIBS, vars.clang_libs.join(" ")),
        (KEY_LLVM_CONFIG, vars.llvm_config.display().to_string()),
        (KEY_LLVM_VERSION_MAJOR, vars.version_major.clone()),
        (KEY_LLVM_VERSION, vars.version.clone()),
        (KEY_LLVM_CXXFLAGS, vars.cxxflags.clone()),
        (KEY_LLVM_LDFLAGS, vars.ldflags.clone()),
        (KEY_LLVM_LIBS, vars.llvm_libs.join(" ")),
    ];

    let mut s = String::new();
    for (key, value) in entries {
        if value.is_empty() {
            writeln!(s, "{key} =").unwrap();
        } else {
            writeln!(s, "{key} = {value}").unwrap();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildVars {
        BuildVars {
            clang: PathBuf::from("/usr/bin/clang-14"),
            include_dirs: vec![PathBuf::from("/usr/include/c++/11"), PathBuf::from("/usr/include")],
            clang_libs: vec!["-lclangAST".into(), "-lLLVMCore".into(), "-lz".into()],
            llvm_config: PathBuf::from("/usr/bin/llvm-config-14"),
            version_major: "14".into(),
            version: "14.0.6".into(),
            cxxflags: "-I/usr/lib/llvm-14/include -std=c++14".into(),
            ldflags: "-L/usr/lib/llvm-14/lib".into(),
            llvm_libs: vec!["-lLLVMCore".into()],
        }
    }

    #[test]
    fn test_gen_vars() {
        let expected = "\
CLANG = /usr/bin/clang-14
CLANG_INCLUDE_FLAGS = -isystem /usr/include/c++/11 -isystem /usr/include
CLANG_LIBS = -lclangAST -lLLVMCore -lz
LLVM_CONFIG = /usr/bin/llvm-config-14
LLVM_VERSION_MAJOR = 14
LLVM_VERSION = 14.0.6
LLVM_CXXFLAGS = -I/usr/lib/llvm-14/include -std=c++14
LLVM_LDFLAGS = -L/usr/lib/llvm-14/lib
LLVM_LIBS = -lLLVMCore
";
        assert_eq!(gen_vars(&sample()), expected);
    }

    #[test]
    fn test_empty_values_have_no_trailing_space() {
        let vars = BuildVars {
            ldflags: String::new(),
            ..sample()
        };
        assert!(gen_vars(&vars).contains("\nLLVM_LDFLAGS =\n"));
    }
}
