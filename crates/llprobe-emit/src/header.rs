//! Generated C header listing the system include directories.

use std::fmt::Write as FmtWrite;
use std::path::PathBuf;

/// Name of the array constant in the generated header.
pub const INCLUDE_DIRS_SYMBOL: &str = "LLPROBE_SYSTEM_INCLUDE_DIRS";

/// Generate the include-directory header.
#[must_use]
pub fn gen_include_header(dirs: &[PathBuf]) -> String {
    let mut s = String::new();
    writeln!(s, "// Generated by llprobe. Do not edit.").unwrap();
    writeln!(s, "#pragma once").unwrap();
    writeln!(s, "static const char *const {INCLUDE_DIRS_SYMBOL}[] = {{").unwrap();
    for dir in dirs {
        writeln!(s, "    \"{}\",", c_escape(&dir.to_string_lossy())).unwrap();
    }
    writeln!(s, "}};").unwrap();
    s
}

fn c_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
