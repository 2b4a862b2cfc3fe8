//! Exclusion list loading.
//!
//! Patterns are forwarded verbatim to the comparator, which owns their
//! syntax. This module only filters lines.

use crate::errors::{io_error, Result};
use serde::Serialize;
use std::path::Path;

/// Ordered list of exclusion patterns, applied by the comparator as a union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionSet {
    patterns: Vec<String>,
}

impl ExclusionSet {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// Parse the text of an exclusion file.
///
/// Lines are trimmed; blank lines and lines starting with `#` are dropped.
pub fn parse_exclusions(text: &str) -> ExclusionSet {
    let patterns = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    ExclusionSet::new(patterns)
}

/// Load the exclusion set from an optional file.
///
/// No file means an empty set.
///
/// # Errors
///
/// `ERR_IO` if the file cannot be read.
pub fn load_exclusions(path: Option<&Path>) -> Result<ExclusionSet> {
    let Some(path) = path else {
        return Ok(ExclusionSet::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| io_error("load_exclusions", e).with_artifact(path.display().to_string()))?;
    Ok(parse_exclusions(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_comments_and_blank_lines_dropped() {
        let set = parse_exclusions("# Comment!\n \n\tcom.io7m.jtensors.*  \n\n#another\ncom.acme.Foo\n");
        assert_eq!(set.patterns(), ["com.io7m.jtensors.*", "com.acme.Foo"]);
    }

    #[test]
    fn test_hash_inside_pattern_is_kept() {
        let set = parse_exclusions("com.acme.Foo#bar\n");
        assert_eq!(set.patterns(), ["com.acme.Foo#bar"]);
    }

    #[test]
    fn test_no_file_is_empty() {
        let set = load_exclusions(None).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("excludes.txt");
        std::fs::write(&path, "# header\r\ncom.acme.internal\r\n").unwrap();

        let set = load_exclusions(Some(&path)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.patterns()[0], "com.acme.internal");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_exclusions(Some(&dir.path().join("nope.txt"))).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Io);
    }
}
