//! llprobe CLI - toolchain probe for clang-based binding builds

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use clap::error::ErrorKind;
use llprobe::ProbeConfig;
use tracing_subscriber::EnvFilter;

use cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.kind() == ErrorKind::DisplayVersion {
                EXIT_SUCCESS
            } else {
                EXIT_FAILURE
            };
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ProbeConfig::from_env()
        .with_output_dir(&cli.out_dir)
        .with_module(&cli.module)
        .with_print(cli.print());
    if let Some(clang) = &cli.clang {
        config = config.with_clang(clang);
    }
    if let Some(llvm_config) = &cli.llvm_config {
        config = config.with_llvm_config(llvm_config);
    }

    let exit_code = commands::run_command(&cli, &config);
    std::process::exit(exit_code);
}
