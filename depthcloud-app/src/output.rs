//! Handing exported bytes to the filesystem.

use crate::errors::AppError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Write `bytes` to `path`, replacing it in one step.
///
/// The data goes to a temporary file in the same directory which is then
/// renamed over `path`, so a failed write never leaves a truncated file.
pub fn save_atomically(bytes: &[u8], path: &Path) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_err = |source: std::io::Error| AppError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
