//! Atomic write primitives
//!
//! Content goes to a uniquely named sibling temp file first, then a single
//! rename moves it into place. A crash mid-write leaves at most a stray temp
//! file, never a truncated target.

use crate::errors::{io_error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Atomically write bytes to a file, creating parent directories as needed
///
/// # Errors
///
/// `ERR_IO` if the directory, temp file, or rename fails.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let parent = match target_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| io_error("create_parent_dir", e))?;

    let mut temp = tempfile::Builder::new()
        .prefix(".semgate-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| io_error("create_temp_sibling", e))?;

    temp.write_all(content)
        .map_err(|e| io_error("write_temp_sibling", e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error("sync_temp_sibling", e))?;

    temp.persist(target_path)
        .map_err(|e| io_error("rename_temp_sibling", e.error))?;

    Ok(())
}
