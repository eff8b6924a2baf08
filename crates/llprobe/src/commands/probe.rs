//! Full probe: discover, then write artifacts.

use llprobe::{ProbeConfig, pipeline};
use tracing::info;

use crate::cli::EXIT_SUCCESS;
use crate::commands::report;
use crate::terminal::{self, Spinner};

pub fn cmd_probe(config: &ProbeConfig, quiet: bool) -> i32 {
    let spinner = Spinner::new("Probing clang and llvm-config...", quiet);
    let discovery = match pipeline::discover(config) {
        Ok(d) => d,
        Err(e) => {
            spinner.finish_and_clear();
            return report(&e);
        }
    };
    spinner.finish_with_success(&format!(
        "clang {} / LLVM {}",
        discovery
            .clang
            .version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        discovery.llvm.info.version
    ));

    let written = match pipeline::emit(config, &discovery) {
        Ok(w) => w,
        Err(e) => return report(&e),
    };
    let changed = written.iter().filter(|w| w.changed).count();
    info!(
        output_dir = %config.output_dir.display(),
        changed,
        total = written.len(),
        "configuration written"
    );
    if !quiet {
        for w in &written {
            terminal::path_output(&w.path, w.changed);
        }
    }
    EXIT_SUCCESS
}
