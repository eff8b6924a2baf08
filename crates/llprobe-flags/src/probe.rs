//! Compiler probe: run the driver with `-###` on a trivial translation unit
//! and recover the system include and library directories it would use.
//!
//! The last two lines of `-###` output are the frontend (preprocess/compile)
//! and link command lines, each printed as a sequence of `"`-quoted words.

use std::fs;
use std::path::{Path, PathBuf};

use llprobe_find::probe::run_combined;
use tracing::{debug, trace};

use crate::classify::classify;
use crate::{FlagsError, Result, dedup_ordered};

/// Translation unit handed to the driver.
const PROBE_SOURCE: &str = "int main() { return 0; }\n";
const PROBE_FILE: &str = "llprobe.cpp";

/// Inputs to a compiler probe.
#[derive(Clone, Copy, Debug)]
pub struct ProbeInput<'a> {
    /// Resolved compiler driver.
    pub compiler: &'a Path,
    /// Extra preprocessor tokens (already split), merged after the trace.
    pub extra_cpp_flags: &'a [String],
    /// Extra linker tokens (already split), merged after the trace.
    pub extra_ld_flags: &'a [String],
    /// `llvm-config --libdir`.
    pub llvm_lib_dir: &'a Path,
    /// `llvm-config --version`.
    pub llvm_version: &'a str,
}

/// Result of probing the compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFlags {
    /// Existing, canonical system include directories in first-seen order.
    pub system_include_dirs: Vec<PathBuf>,
    /// Existing, canonical system library directories in first-seen order.
    pub system_lib_dirs: Vec<PathBuf>,
    /// Frontend tokens merged with the preprocessor overrides.
    pub cpp_flags: Vec<String>,
    /// Link tokens merged with the linker overrides.
    pub ld_flags: Vec<String>,
}

/// Run the compiler probe and parse its output.
///
/// # Errors
/// Returns an error if the probe file cannot be written, the compiler cannot
/// be started, or it prints fewer than two lines.
pub fn probe_compiler(input: &ProbeInput<'_>) -> Result<ParsedFlags> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join(PROBE_FILE);
    fs::write(&source, PROBE_SOURCE)?;

    let compiler = input.compiler.to_string_lossy();
    let source_arg = source.to_string_lossy();
    let output = run_combined(&[&*compiler, "-###", &*source_arg])?;

    parse_trace(&output, input)
}

/// Parse `-###` output captured from `input.compiler`.
///
/// # Errors
/// Returns `MalformedProbeOutput` if there are fewer than two non-blank lines.
pub fn parse_trace(output: &str, input: &ProbeInput<'_>) -> Result<ParsedFlags> {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    let [.., preprocess, link] = lines.as_slice() else {
        return Err(FlagsError::MalformedProbeOutput {
            binary: input.compiler.to_path_buf(),
            lines: lines.len(),
        });
    };
    trace!(line = %preprocess, "frontend trace");
    trace!(line = %link, "link trace");

    let cpp_flags = dedup_ordered(
        split_trace_line(preprocess)
            .into_iter()
            .chain(input.extra_cpp_flags.iter().cloned()),
    );
    let ld_flags = dedup_ordered(
        split_trace_line(link)
            .into_iter()
            .chain(input.extra_ld_flags.iter().cloned()),
    );

    let merged: Vec<&str> = cpp_flags
        .iter()
        .chain(&ld_flags)
        .map(String::as_str)
        .collect();
    let mut dirs = classify(&merged);
    dirs.include_dirs.push(
        input
            .llvm_lib_dir
            .join("clang")
            .join(input.llvm_version)
            .join("include"),
    );

    Ok(ParsedFlags {
        system_include_dirs: existing_dirs(dirs.include_dirs),
        system_lib_dirs: existing_dirs(dirs.lib_dirs),
        cpp_flags,
        ld_flags,
    })
}

/// Split one `-###` line into words.
///
/// The line looks like ` "/usr/bin/ld" "-o" "a.out" ...`: one layer of outer
/// quotes is removed, the rest is split on `" "`, and backslash escapes added
/// by the driver are undone.
#[must_use]
pub fn split_trace_line(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('"').unwrap_or(line);
    let line = line.strip_suffix('"').unwrap_or(line);
    line.split("\" \"")
        .map(unescape)
        .filter(|word| !word.is_empty())
        .collect()
}

fn unescape(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut chars = word.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Deduplicate, canonicalize, and keep only existing directories.
fn existing_dirs(dirs: Vec<PathBuf>) -> Vec<PathBuf> {
    let canonical = dedup_ordered(dirs).into_iter().filter_map(|dir| {
        match fs::canonicalize(&dir) {
            Ok(path) if path.is_dir() => Some(path),
            _ => {
                debug!(dir = %dir.display(), "dropping missing directory");
                None
            }
        }
    });
    dedup_ordered(canonical)
}
