//! Artifact resolution
//!
//! Turns an [`Artifact`] location into a local file. Local paths are used in
//! place; remote URLs are downloaded into a kept temporary file. Resolution
//! fails closed, with one exception: a missing *old* artifact may be replaced
//! by the new one when the caller allows it (first release of a module).

use crate::artifact::{Artifact, ArtifactLocation};
use crate::errors::{fetch_error, io_error, not_found, Result};
use reqwest::{StatusCode, Url};
use semgate_core::errors::{ExError, ExErrorKind, SemgateError};
use semgate_core::schema::{SIDE_NEW, SIDE_OLD};
use semgate_core::{log_op_end, log_op_error, log_op_start};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

const FETCH_PREFIX: &str = "semgate-";
const DEFAULT_SUFFIX: &str = ".jar";

/// How the old side was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OldArtifact {
    /// The old artifact exists and is staged locally
    Staged(Artifact),
    /// The old artifact does not exist; the new artifact stands in for it
    SubstitutedByNew(Artifact),
}

impl OldArtifact {
    pub fn artifact(&self) -> &Artifact {
        match self {
            OldArtifact::Staged(a) | OldArtifact::SubstitutedByNew(a) => a,
        }
    }

    pub fn is_substituted(&self) -> bool {
        matches!(self, OldArtifact::SubstitutedByNew(_))
    }
}

/// Stage the new artifact.
///
/// # Errors
///
/// `ERR_NOT_FOUND` if it does not exist, `ERR_FETCH` on transport failure,
/// `ERR_IO` if the staging file cannot be written.
pub fn resolve_new(artifact: Artifact) -> Result<Artifact> {
    let start = Instant::now();
    stage(artifact, SIDE_NEW).map_err(|err| log_stage_failure(err, SIDE_NEW, start))
}

/// Stage the old artifact.
///
/// With `ignore_missing` set, a missing old artifact resolves to a clone of
/// `new` (same path, same version) so the comparison short-circuits as
/// identical. Every other failure still propagates.
///
/// # Errors
///
/// As [`resolve_new`], except the escape hatch above.
pub fn resolve_old(artifact: Artifact, ignore_missing: bool, new: &Artifact) -> Result<OldArtifact> {
    let start = Instant::now();
    let location = artifact.location().to_string();
    match stage(artifact, SIDE_OLD) {
        Ok(staged) => Ok(OldArtifact::Staged(staged)),
        Err(err) if ignore_missing && err.kind() == ExErrorKind::NotFound => {
            tracing::warn!(
                op = "resolve_artifact",
                side = SIDE_OLD,
                location = %location,
                "old artifact does not exist; comparing the new artifact against itself"
            );
            Ok(OldArtifact::SubstitutedByNew(new.clone()))
        }
        Err(err) => Err(log_stage_failure(err, SIDE_OLD, start)),
    }
}

/// Emit the error event for a failure that is final
fn log_stage_failure(err: ExError, side: &str, start: Instant) -> ExError {
    let location = err.artifact().unwrap_or_default().to_string();
    log_op_error!(
        "resolve_artifact",
        err.clone(),
        duration_ms = start.elapsed().as_millis() as u64,
        side = side,
        location = %location
    );
    err
}

/// Stage one side; logs start and successful end only, failures are logged
/// by the caller once it knows they are fatal
fn stage(artifact: Artifact, side: &str) -> Result<Artifact> {
    let start = Instant::now();
    let location = artifact.location().to_string();
    log_op_start!("resolve_artifact", side = side, location = %location);

    let path = match artifact.location() {
        ArtifactLocation::Local(path) => stage_local(path),
        ArtifactLocation::Remote(url) => fetch_remote(url),
    }
    .map_err(|err| {
        if err.artifact().is_none() {
            err.with_artifact(location.clone())
        } else {
            err
        }
    })?;

    log_op_end!(
        "resolve_artifact",
        duration_ms = start.elapsed().as_millis() as u64,
        side = side,
        path = %path.display()
    );
    Ok(artifact.staged_at(path))
}

fn stage_local(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| io_error("resolve_local", e))?
            .join(path)
    };

    let location = absolute.display().to_string();
    match std::fs::metadata(&absolute) {
        Ok(meta) if meta.is_file() => Ok(absolute),
        Ok(_) => Err(ExError::from(SemgateError::InvalidInput {
            reason: "artifact is not a regular file".to_string(),
        })
        .with_op("resolve_local")
        .with_artifact(location)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(not_found("resolve_local", &location))
        }
        Err(e) => Err(io_error("resolve_local", e).with_artifact(location)),
    }
}

/// Suffix for the staging file, taken from the URL's last path segment
fn staging_suffix(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}

fn fetch_remote(url: &Url) -> Result<PathBuf> {
    let op = "fetch_remote";
    let location = url.as_str();

    let client = reqwest::blocking::Client::builder()
        .timeout(None)
        .build()
        .map_err(|e| fetch_error(op, location, e.to_string()))?;

    let mut response = client
        .get(url.clone())
        .send()
        .map_err(|e| fetch_error(op, location, e.to_string()))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return Err(not_found(op, location));
    }
    if !status.is_success() {
        return Err(fetch_error(op, location, format!("HTTP status {}", status)));
    }

    let mut file = tempfile::Builder::new()
        .prefix(FETCH_PREFIX)
        .suffix(&staging_suffix(url))
        .tempfile()
        .map_err(|e| io_error("create_staging_file", e))?;

    response
        .copy_to(&mut file)
        .map_err(|e| fetch_error(op, location, e.to_string()))?;
    file.flush().map_err(|e| io_error("flush_staging_file", e))?;

    let (_, path) = file
        .keep()
        .map_err(|e| io_error("keep_staging_file", e.error))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_suffix_keeps_archive_extension() {
        let url = Url::parse("https://repo.example.com/a/b/lib-1.0.0.aar").unwrap();
        assert_eq!(staging_suffix(&url), ".aar");

        let url = Url::parse("https://repo.example.com/download?id=5").unwrap();
        assert_eq!(staging_suffix(&url), ".jar");
    }
}
