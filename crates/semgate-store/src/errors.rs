//! Error handling for semgate-store
//!
//! Wraps semgate-core ExError with store-specific helpers

use semgate_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

pub use semgate_core::errors::io_error;

/// Create an artifact-missing error
pub fn not_found(op: &str, location: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_artifact(location)
        .with_message("artifact does not exist")
}

/// Create a fetch failure (transport error or unexpected HTTP status)
pub fn fetch_error(op: &str, location: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Fetch)
        .with_op(op)
        .with_artifact(location)
        .with_message(reason)
}

/// Create an unsupported URL scheme error
pub fn unsupported_scheme(location: &str, scheme: &str) -> ExError {
    ExError::new(ExErrorKind::UnsupportedScheme)
        .with_op("parse_location")
        .with_artifact(location)
        .with_message(format!("unsupported URI scheme '{}'", scheme))
}

/// Create a malformed archive error
pub fn malformed_archive(path: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::MalformedArchive)
        .with_op("normalize_archive")
        .with_artifact(path)
        .with_message(reason)
}
