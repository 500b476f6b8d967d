//! File access for the verifier and the orchestrator

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

/// Read a file, distinguishing a missing file from an unreadable one
pub fn read_existing(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(Error::not_found(path));
    }
    fs::read(path).map_err(|err| {
        Error::with_message(
            ErrorKind::Read,
            format!("failed to read '{}': {err}", path.display()),
        )
    })
}

/// Replace `path` with `bytes` without exposing a half-written file.
///
/// The data goes to a temporary file in the destination directory first and is
/// renamed over `path` once synced. On failure the temporary file is removed
/// and `path` is left as it was.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let fail = |err: std::io::Error| Error::write(format_args!("'{}': {err}", path.display()));

    let mut tmp = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|err| fail(err.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}
