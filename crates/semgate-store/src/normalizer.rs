//! Archive normalization
//!
//! The comparator reads plain jars. An Android archive (`.aar`) is a zip that
//! carries its compiled classes as a nested `classes.jar`; that entry is
//! extracted next to the original and its path returned instead. The
//! extracted jar never replaces a file the caller still needs, such as the
//! other side of the comparison.

use crate::atomic::atomic_write;
use crate::errors::{io_error, malformed_archive, Result};
use semgate_core::{log_op_end, log_op_start};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use zip::result::ZipError;
use zip::ZipArchive;

/// Name of the embedded compiled-classes entry inside an `.aar`
pub const AAR_CLASSES_ENTRY: &str = "classes.jar";

/// True when the path's extension marks an Android archive
pub fn is_android_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("aar"))
        .unwrap_or(false)
}

/// Preferred path for the extracted jar: same name, `.jar` extension
pub fn normalized_path(path: &Path) -> PathBuf {
    path.with_extension("jar")
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Extraction target for `path` that is none of the `keep` files.
///
/// `<stem>.jar` when free, else `<stem>.classes-<n>.jar` for the first free `n`.
pub fn extraction_target(path: &Path, keep: &[&Path]) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut candidate = normalized_path(path);
    let mut n = 1;
    while keep.iter().any(|k| same_file(&candidate, k)) {
        candidate = path.with_file_name(format!("{}.classes-{}.jar", stem, n));
        n += 1;
    }
    candidate
}

/// Return a path the comparator can read.
///
/// Non-Android archives are returned unchanged without touching the disk.
/// An `.aar` is extracted to [`extraction_target`], so none of the `keep`
/// files is overwritten.
///
/// # Errors
///
/// `ERR_MALFORMED_ARCHIVE` if the `.aar` is not a zip or has no
/// `classes.jar`; `ERR_IO` on read/write failure.
pub fn normalize(path: &Path, keep: &[&Path]) -> Result<PathBuf> {
    if !is_android_archive(path) {
        return Ok(path.to_path_buf());
    }

    let start = Instant::now();
    log_op_start!("normalize_archive", path = %path.display());

    let location = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| io_error("open_archive", e).with_artifact(location.clone()))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| malformed_archive(&location, format!("not a zip container: {}", e)))?;

    let mut classes = Vec::new();
    match archive.by_name(AAR_CLASSES_ENTRY) {
        Ok(mut entry) => {
            entry.read_to_end(&mut classes).map_err(|e| {
                malformed_archive(&location, format!("unreadable {}: {}", AAR_CLASSES_ENTRY, e))
            })?;
        }
        Err(ZipError::FileNotFound) => {
            return Err(malformed_archive(
                &location,
                format!("no {} entry in Android archive", AAR_CLASSES_ENTRY),
            ));
        }
        Err(e) => return Err(malformed_archive(&location, e.to_string())),
    }

    let target = extraction_target(path, keep);
    atomic_write(&target, &classes)?;

    log_op_end!(
        "normalize_archive",
        duration_ms = start.elapsed().as_millis() as u64,
        path = %target.display()
    );
    Ok(target)
}
