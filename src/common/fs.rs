//! Common file system operations with unified error handling

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, fs::write_failed};

/// Write `contents` to `path` atomically
///
/// The data lands in a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a half-written file.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| write_failed(path.display().to_string(), e.to_string()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| write_failed(path.display().to_string(), e.to_string()))?;
    temp.write_all(contents.as_bytes())
        .map_err(|e| write_failed(path.display().to_string(), e.to_string()))?;
    temp.persist(path)
        .map_err(|e| write_failed(path.display().to_string(), e.error.to_string()))?;
    Ok(())
}

/// Remove a file or directory tree, ignoring paths that are already gone
pub fn remove_path(path: &Path) -> std::io::Result<()> {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
