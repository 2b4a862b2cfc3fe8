//! Content digests for staged artifacts.
//!
//! SHA-256 over the full file, streamed so large archives are not loaded
//! into memory.

use crate::errors::{io_error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUFFER: usize = 64 * 1024;

/// Hex-encoded SHA-256 of a file's contents
///
/// # Errors
///
/// `ERR_IO` if the file cannot be opened or read.
pub fn file_digest(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| io_error("digest_open", e).with_artifact(path.display().to_string()))?;
    let mut reader = BufReader::with_capacity(READ_BUFFER, file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER];

    loop {
        let read = reader
            .read(&mut buffer)
            .map_err(|e| io_error("digest_read", e).with_artifact(path.display().to_string()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// True when both files have the same digest
///
/// # Errors
///
/// `ERR_IO` if either file cannot be read.
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    if a == b {
        return Ok(true);
    }
    Ok(file_digest(a)? == file_digest(b)?)
}
