//! The single forward pass: locate tools, probe the compiler, enumerate
//! libraries, assemble link lines, and emit artifacts.

use std::path::{Path, PathBuf};

use llprobe_emit::{Artifacts, BuildVars, ParserInput, TestConfig, Written};
use llprobe_find::{Found, PathConfig, locate};
use llprobe_flags::{LibrarySet, ParsedFlags, ProbeInput, link_args, probe_compiler};
use tracing::{info, warn};

use crate::config::{ProbeConfig, parser_input_search};
use crate::llvm::{LlvmConfig, LlvmInfo};
use crate::platform::{OsRelease, install_hint};
use crate::{Error, Result};

const LLVM_LIB_PREFIX: &str = "LLVM";
const CLANG_LIB_PREFIX: &str = "clang";

/// LLVM side of discovery: llvm-config and the LLVM libraries.
#[derive(Clone, Debug)]
pub struct LlvmDiscovery {
    pub llvm_config: Found,
    pub info: LlvmInfo,
    pub libs: LibrarySet,
}

/// Everything discovered in one run.
#[derive(Clone, Debug)]
pub struct Discovery {
    pub clang: Found,
    pub llvm: LlvmDiscovery,
    pub flags: ParsedFlags,
    pub clang_libs: LibrarySet,
    pub parser_input: Option<PathBuf>,
}

impl Discovery {
    /// `-l` arguments for the clang libraries alone.
    #[must_use]
    pub fn clang_link_args(&self, config: &ProbeConfig) -> Vec<String> {
        link_args(&self.clang_libs.names, config.link_style)
    }

    /// Every argument needed to link a clang tool: clang and LLVM libraries
    /// in one group, then LLVM's system libraries.
    #[must_use]
    pub fn combined_link_args(&self, config: &ProbeConfig) -> Vec<String> {
        let names = self.clang_libs.names.iter().chain(&self.llvm.libs.names);
        let mut args = link_args(names, config.link_style);
        args.extend(llprobe_find::shell::split(&self.llvm.info.system_libs));
        args
    }

    /// Values for `config.mk`.
    #[must_use]
    pub fn build_vars(&self, config: &ProbeConfig) -> BuildVars {
        let info = &self.llvm.info;
        BuildVars {
            clang: self.clang.path.clone(),
            include_dirs: self.flags.system_include_dirs.clone(),
            clang_libs: self.combined_link_args(config),
            llvm_config: self.llvm.llvm_config.path.clone(),
            version_major: info.version_major().to_string(),
            version: info.version.clone(),
            cxxflags: info.cxxflags.clone(),
            ldflags: info.ldflags.clone(),
            llvm_libs: self.llvm.link_args(config),
        }
    }

    /// Contents of `tests.json`.
    #[must_use]
    pub fn test_config(&self, config: &ProbeConfig, vars: &BuildVars) -> TestConfig {
        let parser = ParserInput {
            input: self
                .parser_input
                .as_ref()
                .map(|p| p.display().to_string()),
            includes: llprobe_emit::testcfg::include_strings(&self.flags.system_include_dirs),
        };
        let clang_libs = vars.clang_libs.join(" ");
        let libs = [vars.ldflags.as_str(), clang_libs.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        TestConfig::standard(
            &config.module,
            &self.clang.path,
            &vars.include_flags(),
            &vars.cxxflags,
            &libs,
            parser,
        )
    }
}

impl LlvmDiscovery {
    /// `-l` arguments for the LLVM libraries.
    #[must_use]
    pub fn link_args(&self, config: &ProbeConfig) -> Vec<String> {
        link_args(&self.libs.names, config.link_style)
    }
}

/// Locate a required executable, failing with an install hint.
fn require(tool: &str, search: &PathConfig) -> Result<Found> {
    match locate(search) {
        Some(found) => {
            info!(
                tool,
                path = %found.path.display(),
                version = %found.version.as_ref().map(ToString::to_string).unwrap_or_default(),
                "found"
            );
            Ok(found)
        }
        None => Err(Error::ToolNotFound {
            tool: tool.to_string(),
            searched: search.search_paths.clone(),
            hint: install_hint(OsRelease::detect().as_ref()),
        }),
    }
}

fn require_libs(libs: LibrarySet, prefix: &str) -> Result<LibrarySet> {
    if libs.is_empty() {
        return Err(Error::EmptyLibrarySet {
            prefix: prefix.to_string(),
            mode: libs.mode,
            dirs: libs.dirs,
            hint: install_hint(OsRelease::detect().as_ref()),
        });
    }
    info!(prefix, count = libs.names.len(), mode = %libs.mode, "libraries");
    Ok(libs)
}

/// Locate llvm-config, query it, and enumerate the LLVM libraries.
///
/// # Errors
/// Returns `ToolNotFound`, `LlvmConfig`, or `EmptyLibrarySet`.
pub fn discover_llvm(config: &ProbeConfig) -> Result<LlvmDiscovery> {
    let llvm_config = require("llvm-config", &config.llvm_config_search()?)?;
    let info = LlvmConfig::new(&llvm_config.path).info(config.link_mode)?;
    let libs = require_libs(
        LibrarySet::scan(
            std::slice::from_ref(&info.lib_dir),
            LLVM_LIB_PREFIX,
            config.link_mode,
        ),
        LLVM_LIB_PREFIX,
    )?;
    Ok(LlvmDiscovery {
        llvm_config,
        info,
        libs,
    })
}

/// Run every discovery step.
///
/// # Errors
/// Returns the first fatal condition: a missing tool, a malformed compiler
/// probe, a failing llvm-config query, or an empty library set.
pub fn discover(config: &ProbeConfig) -> Result<Discovery> {
    let clang = require("clang", &config.clang_search()?)?;
    let llvm = discover_llvm(config)?;

    let flags = probe_compiler(&ProbeInput {
        compiler: &clang.path,
        extra_cpp_flags: &config.extra_cpp_flags,
        extra_ld_flags: &config.extra_ld_flags,
        llvm_lib_dir: &llvm.info.lib_dir,
        llvm_version: &llvm.info.version,
    })?;
    info!(
        include_dirs = flags.system_include_dirs.len(),
        lib_dirs = flags.system_lib_dirs.len(),
        "probed compiler"
    );

    let mut lib_dirs = flags.system_lib_dirs.clone();
    lib_dirs.push(llvm.info.lib_dir.clone());
    let lib_dirs = llprobe_flags::dedup_ordered(lib_dirs);
    let clang_libs = require_libs(
        LibrarySet::scan(&lib_dirs, CLANG_LIB_PREFIX, config.link_mode),
        CLANG_LIB_PREFIX,
    )?;

    let parser_input = find_parser_input(&llvm.info.include_dir, &flags.system_include_dirs);

    Ok(Discovery {
        clang,
        llvm,
        flags,
        clang_libs,
        parser_input,
    })
}

fn find_parser_input(llvm_include_dir: &Path, include_dirs: &[PathBuf]) -> Option<PathBuf> {
    let found = locate(&parser_input_search(llvm_include_dir, include_dirs)).map(|f| f.path);
    if found.is_none() {
        warn!("clang-c/Index.h not found; test configuration has no parser input");
    }
    found
}

/// Write the three artifacts for `discovery`.
///
/// # Errors
/// Returns an error if any file cannot be written.
pub fn emit(config: &ProbeConfig, discovery: &Discovery) -> Result<Vec<Written>> {
    let vars = discovery.build_vars(config);
    let tests = discovery.test_config(config, &vars);
    Ok(Artifacts::new(&config.output_dir).write_all(&vars, &tests)?)
}

/// Discover and emit.
///
/// # Errors
/// See [`discover`] and [`emit`].
pub fn run(config: &ProbeConfig) -> Result<Vec<Written>> {
    let discovery = discover(config)?;
    emit(config, &discovery)
}
