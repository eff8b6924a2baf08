//! Command implementations.

mod print;
mod probe;

use llprobe::ProbeConfig;
use tracing::error;

use crate::cli::{Cli, EXIT_FAILURE};
use crate::terminal;

/// Dispatch to print mode or the full probe.
pub fn run_command(cli: &Cli, config: &ProbeConfig) -> i32 {
    match config.print {
        Some(which) => print::cmd_print(config, which),
        None => probe::cmd_probe(config, cli.quiet),
    }
}

/// Log a fatal error with its hint and return the failure code.
fn report(err: &llprobe::Error) -> i32 {
    error!(error = %err, "probe failed");
    terminal::error(&err.to_string());
    if let Some(hint) = err.hint() {
        terminal::hint(hint);
    }
    EXIT_FAILURE
}
