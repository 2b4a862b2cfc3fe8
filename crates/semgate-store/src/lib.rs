//! semgate store - artifact staging on the local filesystem
//!
//! Provides:
//! - Artifact resolution (local paths and remote URLs) with the
//!   missing-old-artifact escape hatch
//! - Android archive normalization (`.aar` → embedded `classes.jar`)
//! - Content digests for the identical-artifact short-circuit
//! - Atomic temp→rename writes

pub mod artifact;
pub mod atomic;
pub mod digest;
pub mod errors;
pub mod normalizer;
pub mod resolver;

// Re-export key types
pub use artifact::{Artifact, ArtifactLocation};
pub use atomic::atomic_write;
pub use digest::{file_digest, same_content};
pub use errors::Result;
pub use normalizer::normalize;
pub use resolver::{resolve_new, resolve_old, OldArtifact};
