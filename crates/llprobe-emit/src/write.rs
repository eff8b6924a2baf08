//! Idempotent file writes.

use std::fs;
use std::io;
use std::path::Path;

use tracing::trace;

/// Write `content` to `path` unless the file already holds exactly that.
///
/// Returns `true` if the file was created or replaced. An unchanged file is
/// left untouched, so its modification time does not trigger rebuilds.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, or cannot be written.
pub fn write_if_changed(path: &Path, content: &str) -> io::Result<bool> {
    match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            trace!(path = %path.display(), "unchanged");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    trace!(path = %path.display(), "writing");
    fs::write(path, content)?;
    Ok(true)
}
