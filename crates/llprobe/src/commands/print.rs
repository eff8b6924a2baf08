//! `--print-llvm-libs` / `--print-clang-libs`.

use llprobe::{PrintLibs, ProbeConfig, pipeline};
use tracing::debug;

use crate::cli::EXIT_SUCCESS;
use crate::commands::report;

/// Print the requested link arguments on one stdout line.
pub fn cmd_print(config: &ProbeConfig, which: PrintLibs) -> i32 {
    let args = match which {
        PrintLibs::Llvm => pipeline::discover_llvm(config).map(|llvm| llvm.link_args(config)),
        PrintLibs::Clang => pipeline::discover(config).map(|d| d.combined_link_args(config)),
    };
    match args {
        Ok(args) => {
            debug!(count = args.len(), ?which, "printing link arguments");
            println!("{}", args.join(" "));
            EXIT_SUCCESS
        }
        Err(e) => report(&e),
    }
}
