//! CLI definitions.

use std::path::PathBuf;

use clap::Parser;
use llprobe::PrintLibs;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure, and for help output.
pub const EXIT_FAILURE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "llprobe")]
#[command(about = "Locate clang and llvm-config, probe system paths, and emit build configuration")]
#[command(version)]
pub struct Cli {
    /// Compiler driver to use instead of searching PATH
    #[arg(long, value_name = "PATH")]
    pub clang: Option<PathBuf>,

    /// llvm-config to use instead of searching PATH
    #[arg(long = "llvm-config", value_name = "PATH")]
    pub llvm_config: Option<PathBuf>,

    /// Print the LLVM library link arguments and exit
    #[arg(long, conflicts_with = "print_clang_libs")]
    pub print_llvm_libs: bool,

    /// Print the clang library link arguments and exit
    #[arg(long)]
    pub print_clang_libs: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Log every discovery decision
    #[arg(long)]
    pub debug: bool,

    /// Directory the generated files are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Module name recorded in the test configuration
    #[arg(long, default_value = "clang")]
    pub module: String,
}

impl Cli {
    /// Requested print mode, if any.
    pub const fn print(&self) -> Option<PrintLibs> {
        if self.print_llvm_libs {
            Some(PrintLibs::Llvm)
        } else if self.print_clang_libs {
            Some(PrintLibs::Clang)
        } else {
            None
        }
    }

    /// Default tracing directive for the verbosity flags.
    pub const fn log_directive(&self) -> &'static str {
        if self.debug {
            "llprobe=debug"
        } else if self.quiet {
            "llprobe=error"
        } else {
            "llprobe=info"
        }
    }
}
