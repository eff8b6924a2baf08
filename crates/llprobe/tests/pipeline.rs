//! End-to-end discovery against a fake toolchain.

#![cfg(unix)]

mod common;

use std::fs;

use common::{Toolchain, VERSION, serial, touch};
use llprobe::{Error, FlagsError, LinkMode, pipeline};

fn mk_line<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(" ="))
        .map(str::trim)
}

#[test]
fn test_full_probe_writes_artifacts() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc.config();

    let written = pipeline::run(&config).unwrap();
    assert_eq!(written.len(), 3);
    assert!(written.iter().all(|w| w.changed));

    let mk = fs::read_to_string(tc.out.join("config.mk")).unwrap();
    assert_eq!(mk_line(&mk, "CLANG"), Some(tc.clang().to_str().unwrap()));
    assert_eq!(
        mk_line(&mk, "LLVM_CONFIG"),
        Some(tc.llvm_config().to_str().unwrap())
    );
    assert_eq!(mk_line(&mk, "LLVM_VERSION"), Some(VERSION));
    assert_eq!(mk_line(&mk, "LLVM_VERSION_MAJOR"), Some("14"));
    assert_eq!(
        mk_line(&mk, "CLANG_INCLUDE_FLAGS").unwrap(),
        format!(
            "-isystem {} -isystem {}",
            tc.sys_include.display(),
            tc.resource_include().display()
        )
    );
    assert_eq!(
        mk_line(&mk, "CLANG_LIBS"),
        Some(
            "-Wl,--start-group -lclangAST -lclangBasic -lLLVMCore -lLLVMSupport \
             -Wl,--end-group -lz -lpthread"
        )
    );
    assert_eq!(
        mk_line(&mk, "LLVM_LIBS"),
        Some("-Wl,--start-group -lLLVMCore -lLLVMSupport -Wl,--end-group")
    );

    let header = fs::read_to_string(tc.out.join("clang_includes.h")).unwrap();
    assert!(header.contains("#pragma once"));
    assert!(header.contains(&format!("\"{}\",", tc.sys_include.display())));

    let tests: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tc.out.join("tests.json")).unwrap()).unwrap();
    assert_eq!(tests["module"], "clang");
    let input = tests["parser"]["input"].as_str().unwrap();
    assert!(input.ends_with("clang-c/Index.h"));
    let libs = tests["libs"].as_str().unwrap();
    assert!(libs.starts_with(&format!("-L{}", tc.lib.display())));
    assert!(libs.contains("-lclangAST"));
    assert!(tests["generators"]["cxx"]["build"]
        .as_str()
        .unwrap()
        .contains("-std=c++17"));
}

#[test]
fn test_rerun_leaves_files_untouched() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc.config();

    pipeline::run(&config).unwrap();
    let again = pipeline::run(&config).unwrap();
    assert!(again.iter().all(|w| !w.changed));
}

#[test]
fn test_missing_clang_is_tool_not_found() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc.config().with_search_paths(Vec::<std::path::PathBuf>::new());

    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, Error::ToolNotFound { ref tool, .. } if tool == "clang"));
    assert!(err.hint().is_some_and(|h| !h.is_empty()));
    assert!(!tc.out.exists());
}

#[test]
fn test_explicit_paths_bypass_search() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc
        .config()
        .with_search_paths(Vec::<std::path::PathBuf>::new())
        .with_clang(tc.clang())
        .with_llvm_config(tc.llvm_config());

    let discovery = pipeline::discover(&config).unwrap();
    assert_eq!(discovery.clang.path, tc.clang());
    assert_eq!(discovery.llvm.llvm_config.path, tc.llvm_config());
}

#[test]
fn test_version_gate_rejects_old_clang() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc.config().with_min_versions("15.0.0", "6.0.0");

    let err = pipeline::discover(&config).unwrap_err();
    assert!(matches!(err, Error::ToolNotFound { ref tool, .. } if tool == "clang"));
}

#[test]
fn test_no_dynamic_clang_libs_is_empty_set() {
    let _guard = serial();
    let tc = Toolchain::new();
    let config = tc.config().with_link_mode(LinkMode::Dynamic);

    // libLLVMCore.so satisfies the LLVM set; there is no dynamic clang library.
    let err = pipeline::discover(&config).unwrap_err();
    assert!(
        matches!(err, Error::EmptyLibrarySet { ref prefix, mode: LinkMode::Dynamic, .. } if prefix == "clang")
    );
    assert!(err.hint().is_some());
}

#[test]
fn test_print_llvm_libs_needs_only_llvm_config() {
    let _guard = serial();
    let tc = Toolchain::new();
    fs::remove_file(tc.clang()).unwrap();
    let config = tc.config();

    let llvm = pipeline::discover_llvm(&config).unwrap();
    assert_eq!(
        llvm.link_args(&config),
        vec!["-Wl,--start-group", "-lLLVMCore", "-lLLVMSupport", "-Wl,--end-group"]
    );
}

#[test]
fn test_malformed_probe_output() {
    let _guard = serial();
    let tc = Toolchain::new();
    tc.write_clang("clang version 14.0.6\n");

    let err = pipeline::discover(&tc.config()).unwrap_err();
    assert!(matches!(
        err,
        Error::Flags(FlagsError::MalformedProbeOutput { lines: 1, .. })
    ));
}

#[test]
fn test_missing_parser_input_is_not_fatal() {
    let _guard = serial();
    let tc = Toolchain::new();
    fs::remove_file(tc.include.join("clang-c/Index.h")).unwrap();

    let discovery = pipeline::discover(&tc.config()).unwrap();
    assert_eq!(discovery.parser_input, None);
}

#[test]
fn test_ldflags_extend_library_search() {
    let _guard = serial();
    let tc = Toolchain::new();
    let extra = tc.root.path().join("extra");
    fs::create_dir_all(&extra).unwrap();
    touch(&extra, &["libclangLex.a"]);
    let config = tc
        .config()
        .with_extra_flags(Vec::new(), vec![format!("-L{}", extra.display())]);

    let discovery = pipeline::discover(&config).unwrap();
    assert!(discovery.clang_libs.names.contains("clangLex"));
    assert!(discovery.clang_libs.names.contains("clangBasic"));
}
