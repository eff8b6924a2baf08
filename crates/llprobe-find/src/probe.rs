//! Probe invocations: run a tool and capture what it prints.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::{FindError, Result, shell};

/// Placeholder replaced by the candidate path in probe command templates.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// Expand a probe template into argv, substituting `candidate` for the placeholder.
///
/// The template is split first so a candidate path containing spaces stays one word.
///
/// # Errors
/// Returns `EmptyProbeCommand` if the template has no words.
pub fn expand_template(template: &str, candidate: &Path) -> Result<Vec<String>> {
    let candidate = candidate.to_string_lossy();
    let argv: Vec<String> = shell::split(template)
        .into_iter()
        .map(|word| word.replace(PATH_PLACEHOLDER, &candidate))
        .collect();
    if argv.is_empty() {
        return Err(FindError::EmptyProbeCommand(template.to_string()));
    }
    Ok(argv)
}

/// Run `argv` and return stdout followed by stderr.
///
/// The exit status is logged but not checked: tools print their version
/// banner regardless of what else they complain about.
///
/// # Errors
/// Returns `Spawn` if the process cannot be started.
pub fn run_combined<S: AsRef<str>>(argv: &[S]) -> Result<String> {
    let Some((program, args)) = argv.split_first() else {
        return Err(FindError::EmptyProbeCommand(String::new()));
    };
    let command_line = argv
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    debug!(command = %command_line, "running probe");

    let output = Command::new(program.as_ref())
        .args(args.iter().map(AsRef::as_ref))
        .output()
        .map_err(|source| FindError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    if !output.status.success() {
        debug!(command = %command_line, status = %output.status, "probe exited unsuccessfully");
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}

/// Expand `template` for `candidate` and run it.
///
/// # Errors
/// Returns an error if the template is empty or the process cannot be started.
pub fn run_template(template: &str, candidate: &Path) -> Result<String> {
    let argv = expand_template(template, candidate)?;
    run_combined(&argv)
}
