//! The seam between the decision core and the binary API analysis.

use crate::errors::Result;
use crate::exclusions::ExclusionSet;
use crate::model::ChangeModel;
use std::path::Path;

/// Compares two normalized jar archives and reports API-level changes.
///
/// Implementations own the exclusion pattern syntax: patterns arrive
/// verbatim from the exclusion list.
pub trait ApiComparator {
    /// # Errors
    ///
    /// Implementation-defined; unreadable archives and malformed patterns are
    /// expected to surface as `ERR_MALFORMED_ARCHIVE`, `ERR_CLASS_FORMAT` or
    /// `ERR_INVALID_PATTERN`.
    fn compare(
        &self,
        old_archive: &Path,
        new_archive: &Path,
        exclusions: &ExclusionSet,
    ) -> Result<ChangeModel>;
}
