//! Exclusion pattern matching.
//!
//! Patterns are globs over dotted names (`*` spans dots, `?` is one
//! character, `[...]` a class). A bare pattern excludes every class it
//! matches, and every class nested inside a package or outer class it
//! matches. `Class#member` excludes members of matching classes by name.

use glob::{MatchOptions, Pattern};
use semgate_core::errors::Result;
use semgate_core::{ExclusionSet, SemgateError};

const MEMBER_SEPARATOR: char = '#';

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    classes: Vec<Pattern>,
    members: Vec<(Pattern, Pattern)>,
}

fn compile(raw: &str, part: &str) -> Result<Pattern> {
    if part.is_empty() {
        return Err(SemgateError::InvalidPattern {
            pattern: raw.to_string(),
            reason: "empty class or member part".to_string(),
        }
        .into());
    }
    Pattern::new(part).map_err(|e| {
        SemgateError::InvalidPattern {
            pattern: raw.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// `com.acme.Outer$Inner` → `com`, `com.acme`, `com.acme.Outer`, then the name itself
fn enclosing_names(class_name: &str) -> impl Iterator<Item = &str> {
    class_name
        .char_indices()
        .filter(|(_, c)| *c == '.' || *c == '$')
        .map(move |(i, _)| &class_name[..i])
        .chain(std::iter::once(class_name))
}

fn class_matches(pattern: &Pattern, class_name: &str) -> bool {
    enclosing_names(class_name).any(|name| pattern.matches_with(name, MATCH_OPTIONS))
}

impl ExclusionMatcher {
    /// Compile an exclusion set.
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_PATTERN` for a malformed glob or an empty `Class#` /
    /// `#member` half.
    pub fn compile(set: &ExclusionSet) -> Result<Self> {
        let mut matcher = Self::default();
        for raw in set.patterns() {
            match raw.split_once(MEMBER_SEPARATOR) {
                Some((class, member)) => matcher
                    .members
                    .push((compile(raw, class)?, compile(raw, member)?)),
                None => matcher.classes.push(compile(raw, raw)?),
            }
        }
        Ok(matcher)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.members.is_empty()
    }

    /// True when the whole class is excluded
    pub fn excludes_class(&self, class_name: &str) -> bool {
        self.classes.iter().any(|p| class_matches(p, class_name))
    }

    /// True when `member_name` of `class_name` is excluded
    pub fn excludes_member(&self, class_name: &str, member_name: &str) -> bool {
        self.members.iter().any(|(class, member)| {
            class_matches(class, class_name) && member.matches_with(member_name, MATCH_OPTIONS)
        })
    }
}
