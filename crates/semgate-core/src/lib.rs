//! semgate core - the version-compliance decision kernel
//!
//! This crate provides:
//! - Semantic versions and the NONE < PATCH < MINOR < MAJOR change scale
//! - The API change model and the `ApiComparator` seam
//! - Exclusion list loading
//! - The pass/fail policy (`policy::decide`)
//! - Text, HTML and JSON report renderers
//! - The error and logging facilities shared by the workspace

pub mod comparator;
pub mod errors;
pub mod exclusions;
pub mod logging_facility;
pub mod model;
pub mod policy;
pub mod report;
pub mod version;

pub use semgate_core_types::schema;

// Re-export commonly used types
pub use comparator::ApiComparator;
pub use errors::{ExError, ExErrorKind, Result, SemgateError};
pub use exclusions::{load_exclusions, ExclusionSet};
pub use model::{ChangeModel, ChangeStatus, ClassChange, MemberChange, MemberKind};
pub use policy::{decide, required_change, DecisionInput, PassReason, Verdict};
pub use version::{ChangeType, SemanticVersion};
