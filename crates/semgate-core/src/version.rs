//! Semantic versions and the change-type scale.
//!
//! Declared bumps (old → new) and required bumps (what the API diff demands)
//! are both expressed as a [`ChangeType`] so the policy can compare ranks.

use crate::errors::{Result, SemgateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimal semantic-version component a change requires.
///
/// Ordered: `None < Patch < Minor < Major`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    None,
    Patch,
    Minor,
    Major,
}

impl ChangeType {
    /// Ordinal position on the scale, 0 for `None` through 3 for `Major`
    pub fn rank(&self) -> u8 {
        match self {
            ChangeType::None => 0,
            ChangeType::Patch => 1,
            ChangeType::Minor => 2,
            ChangeType::Major => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::None => "NONE",
            ChangeType::Patch => "PATCH",
            ChangeType::Minor => "MINOR",
            ChangeType::Major => "MAJOR",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `major.minor.patch` triple.
///
/// A trailing pre-release or build suffix (`-rc1`, `+build.5`) is kept for
/// display and ignored for classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    major: u64,
    minor: u64,
    patch: u64,
    suffix: Option<String>,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            suffix: None,
        }
    }

    /// Parse a declared version string.
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_VERSION` unless the core is exactly three dot-separated
    /// non-negative decimal integers.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || SemgateError::InvalidVersion {
            version: input.to_string(),
        };

        let (core, suffix) = match input.find(|c: char| c == '-' || c == '+') {
            Some(idx) => {
                let suffix = &input[idx + 1..];
                if suffix.is_empty() {
                    return Err(invalid().into());
                }
                (&input[..idx], Some(input[idx..].to_string()))
            }
            None => (input, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid().into());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid().into());
            }
            *slot = part.parse::<u64>().map_err(|_| invalid())?;
        }

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            suffix,
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    fn triple(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Classify the bump from `self` (old) to `new`.
    ///
    /// # Errors
    ///
    /// `ERR_VERSION_NOT_INCREASING` when `new` is equal to or lower than
    /// `self`.
    pub fn classify(&self, new: &SemanticVersion) -> Result<ChangeType> {
        if new.triple() <= self.triple() {
            return Err(SemgateError::VersionNotIncreasing {
                old: self.to_string(),
                new: new.to_string(),
            }
            .into());
        }

        let change = if new.major != self.major {
            ChangeType::Major
        } else if new.minor != self.minor {
            ChangeType::Minor
        } else {
            ChangeType::Patch
        };
        Ok(change)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(suffix) = &self.suffix {
            f.write_str(suffix)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = crate::errors::ExError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
