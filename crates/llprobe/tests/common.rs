//! Shared fixtures: a fake toolchain in a temporary directory.

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use llprobe::{LinkStyle, ProbeConfig};
use tempfile::TempDir;

pub const VERSION: &str = "14.0.6";

/// Serializes tests that write and then execute stub scripts, so no other
/// thread holds a writable descriptor to a script while it is exec'd.
pub fn serial() -> MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Directory layout of a fake LLVM install plus a separate system lib dir.
pub struct Toolchain {
    pub root: TempDir,
    pub bin: PathBuf,
    /// `llvm-config --libdir`.
    pub lib: PathBuf,
    /// `llvm-config --includedir`.
    pub include: PathBuf,
    /// Named by `-internal-isystem` in the frontend trace.
    pub sys_include: PathBuf,
    /// Named by `-L` in the link trace.
    pub sys_lib: PathBuf,
    pub out: PathBuf,
}

impl Toolchain {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let base = root.path().canonicalize().unwrap();
        let tc = Self {
            bin: base.join("llvm/bin"),
            lib: base.join("llvm/lib"),
            include: base.join("llvm/include"),
            sys_include: base.join("sys/include"),
            sys_lib: base.join("sys/lib"),
            out: base.join("out"),
            root,
        };
        for dir in [&tc.bin, &tc.lib, &tc.sys_include, &tc.sys_lib] {
            fs::create_dir_all(dir).unwrap();
        }
        fs::create_dir_all(tc.resource_include()).unwrap();
        fs::create_dir_all(tc.include.join("clang-c")).unwrap();
        fs::write(tc.include.join("clang-c/Index.h"), "").unwrap();

        touch(
            &tc.lib,
            &["libLLVMCore.a", "libLLVMSupport.a", "libclangAST.a", "libLLVMCore.so"],
        );
        touch(&tc.sys_lib, &["libclangBasic.a", "libunrelated.a"]);

        tc.write_clang(&tc.default_trace());
        tc.write_llvm_config();
        tc
    }

    /// `<libdir>/clang/<version>/include`.
    pub fn resource_include(&self) -> PathBuf {
        self.lib.join("clang").join(VERSION).join("include")
    }

    pub fn clang(&self) -> PathBuf {
        self.bin.join("clang")
    }

    pub fn llvm_config(&self) -> PathBuf {
        self.bin.join("llvm-config")
    }

    /// Config searching only the fake bin directory.
    pub fn config(&self) -> ProbeConfig {
        ProbeConfig::new()
            .with_search_paths([&self.bin])
            .with_link_style(LinkStyle::Grouped)
            .with_output_dir(&self.out)
    }

    fn default_trace(&self) -> String {
        format!(
            "clang version {VERSION}\nTarget: x86_64-unknown-linux-gnu\n \
             \"{bin}/clang\" \"-cc1\" \"-internal-isystem\" \"{inc}\" \"-o\" \"/tmp/x.o\"\n \
             \"/usr/bin/ld\" \"-L{lib}/\" \"-o\" \"a.out\" \"/tmp/x.o\"\n",
            bin = self.bin.display(),
            inc = self.sys_include.display(),
            lib = self.sys_lib.display(),
        )
    }

    /// Replace the compiler stub; `trace` is what `-###` prints on stderr.
    pub fn write_clang(&self, trace: &str) {
        let body = format!(
            "if [ \"$1\" = \"--version\" ]; then\n  echo \"clang version {VERSION}\"\n  exit 0\nfi\ncat >&2 <<'TRACE'\n{trace}TRACE\n"
        );
        write_script(&self.clang(), &body);
    }

    fn write_llvm_config(&self) {
        let body = format!(
            "case \"$1\" in\n\
             --version) echo {VERSION} ;;\n\
             --libdir) echo {lib} ;;\n\
             --includedir) echo {include} ;;\n\
             --cxxflags) echo \"-I{include} -std=c++17 -fno-exceptions\" ;;\n\
             --ldflags) echo \"-L{lib}\" ;;\n\
             --system-libs) echo \"-lz -lpthread\" ;;\n\
             *) echo \"unknown option $1\" >&2; exit 1 ;;\n\
             esac\n",
            lib = self.lib.display(),
            include = self.include.display(),
        );
        write_script(&self.llvm_config(), &body);
    }
}

pub fn touch(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), "").unwrap();
    }
}

pub fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
