// Integration tests for artifact resolution

use semgate_core::logging_facility::init_test_capture;
use semgate_core::schema::EVENT_END_ERROR;
use semgate_core::ExErrorKind;
use tracing::Level;
use semgate_store::resolver::{resolve_new, resolve_old, OldArtifact};
use semgate_store::{Artifact, ArtifactLocation};
use std::net::TcpListener;
use std::path::PathBuf;
use tempfile::TempDir;

fn local(path: PathBuf, version: &str) -> Artifact {
    Artifact::new(ArtifactLocation::Local(path), version)
}

fn staged_new(dir: &TempDir) -> Artifact {
    let path = dir.path().join("new.jar");
    std::fs::write(&path, b"new").unwrap();
    resolve_new(local(path, "2.0.0")).unwrap()
}

/// A localhost URL nothing is listening on
fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/old.jar", port)
}

#[test]
fn test_local_path_is_used_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lib.jar");
    std::fs::write(&path, b"jar").unwrap();

    let artifact = resolve_new(local(path.clone(), "1.0.0")).unwrap();

    assert_eq!(artifact.staged_path(), Some(path.as_path()));
    assert_eq!(artifact.version(), "1.0.0");
}

#[test]
fn test_missing_new_artifact_is_fatal() {
    let dir = TempDir::new().unwrap();

    let err = resolve_new(local(dir.path().join("nonexistent"), "1.0.0")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_missing_old_artifact_without_escape_hatch_is_fatal() {
    let dir = TempDir::new().unwrap();
    let new = staged_new(&dir);

    let err = resolve_old(local(dir.path().join("nonexistent"), "1.0.0"), false, &new)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_missing_old_artifact_with_escape_hatch_clones_new() {
    // Given: no old artifact, ignore-missing set
    let dir = TempDir::new().unwrap();
    let new = staged_new(&dir);

    // When: the old side is resolved
    let old = resolve_old(local(dir.path().join("nonexistent"), "1.0.0"), true, &new).unwrap();

    // Then: the new artifact stands in, path and version included
    assert!(old.is_substituted());
    assert_eq!(old.artifact().staged_path(), new.staged_path());
    assert_eq!(old.artifact().version(), "2.0.0");
}

#[test]
fn test_existing_old_artifact_is_staged_even_with_escape_hatch() {
    let dir = TempDir::new().unwrap();
    let new = staged_new(&dir);
    let old_path = dir.path().join("old.jar");
    std::fs::write(&old_path, b"old").unwrap();

    let old = resolve_old(local(old_path.clone(), "1.0.0"), true, &new).unwrap();

    assert_eq!(old, OldArtifact::Staged(old.artifact().clone()));
    assert_eq!(old.artifact().staged_path(), Some(old_path.as_path()));
}

#[test]
fn test_directory_is_not_an_artifact() {
    let dir = TempDir::new().unwrap();

    let err = resolve_new(local(dir.path().to_path_buf(), "1.0.0")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_transport_failure_is_not_swallowed_by_escape_hatch() {
    // Given: an old URL whose host refuses connections
    let dir = TempDir::new().unwrap();
    let new = staged_new(&dir);
    let location = ArtifactLocation::parse(&refused_url()).unwrap();

    // When: resolving with ignore-missing set
    let err = resolve_old(Artifact::new(location, "1.0.0"), true, &new).unwrap_err();

    // Then: only "does not exist" is forgiven; a fetch error still fails
    assert_eq!(err.kind(), ExErrorKind::Fetch);
}

#[test]
fn test_forgiven_missing_old_artifact_logs_no_error_event() {
    let capture = init_test_capture();
    let dir = TempDir::new().unwrap();
    let new = staged_new(&dir);
    let forgiven = dir.path().join("forgiven.jar");
    let fatal = dir.path().join("fatal.jar");
    let error_events_at = |path: &PathBuf| {
        let location = path.display().to_string();
        capture.count_events(|e| {
            e.level == Level::ERROR
                && e.op.as_deref() == Some("resolve_artifact")
                && e.event.as_deref() == Some(EVENT_END_ERROR)
                && e.fields.get("location") == Some(&location)
        })
    };

    resolve_old(local(forgiven.clone(), "1.0.0"), true, &new).unwrap();
    resolve_old(local(fatal.clone(), "1.0.0"), false, &new).unwrap_err();

    assert_eq!(error_events_at(&forgiven), 0);
    assert_eq!(error_events_at(&fatal), 1);
    assert_eq!(
        capture.count_events(|e| {
            e.level == Level::WARN
                && e.fields.get("location") == Some(&forgiven.display().to_string())
        }),
        1
    );
}
