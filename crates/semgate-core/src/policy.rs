//! Version compliance policy
//!
//! Pure functions that turn the declared versions and a [`ChangeModel`] into
//! a [`Verdict`]. Nothing here touches the filesystem.
//!
//! Decision order:
//! 1. Byte-identical artifacts pass without looking at versions.
//! 2. The declared bump is classified; a non-increasing pair is an error,
//!    which names the required bump when the changes need more than a patch.
//! 3. When both majors are zero the check is skipped (pre-1.0 exemption).
//! 4. The required bump must not outrank the declared bump.

use crate::errors::{Result, SemgateError};
use crate::model::ChangeModel;
use crate::version::{ChangeType, SemanticVersion};
use serde::Serialize;
use std::fmt;

/// What the policy gets to look at
#[derive(Debug, Clone, Copy)]
pub enum DecisionInput<'a> {
    /// Staged artifacts have the same content digest; no diff was run
    Identical,
    /// Output of the comparator
    Changes(&'a ChangeModel),
}

/// Why a check passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassReason {
    Identical,
    PreRelease,
    Compliant,
}

/// Outcome of a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass(PassReason),
    Fail {
        old: SemanticVersion,
        new: SemanticVersion,
        declared: ChangeType,
        required: ChangeType,
    },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass(_))
    }

    /// Process exit code for this verdict
    pub fn exit_code(&self) -> i32 {
        if self.is_pass() {
            0
        } else {
            1
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass(_) => "pass",
            Verdict::Fail { .. } => "fail",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass(PassReason::Identical) => {
                f.write_str("The old and new artifacts are identical")
            }
            Verdict::Pass(PassReason::PreRelease) => f.write_str(
                "Both versions are below 1.0.0; no compatibility guarantee applies",
            ),
            Verdict::Pass(PassReason::Compliant) => {
                f.write_str("The declared version change covers the changes made to the code")
            }
            Verdict::Fail {
                old,
                new,
                declared,
                required,
            } => write!(
                f,
                "The version change between {} and {} is {}, but the changes made to the code require a {} version change",
                old, new, declared, required
            ),
        }
    }
}

/// Reduce a change model to the bump it requires.
///
/// The most severe record wins; a model with nothing above `Patch` (including
/// an empty one) requires `Patch`.
pub fn required_change(model: &ChangeModel) -> ChangeType {
    model
        .classes()
        .iter()
        .map(|c| c.max_severity())
        .fold(ChangeType::Patch, ChangeType::max)
}

/// Decide whether the declared bump from `old` to `new` covers the changes.
///
/// # Errors
///
/// `ERR_VERSION_NOT_INCREASING` when the artifacts differ and `new` does not
/// strictly exceed `old`. A non-increasing pair counts as a `PATCH`
/// declaration, so the message cites the required bump when it is larger.
pub fn decide(
    old: &SemanticVersion,
    new: &SemanticVersion,
    input: DecisionInput<'_>,
) -> Result<Verdict> {
    let model = match input {
        DecisionInput::Identical => return Ok(Verdict::Pass(PassReason::Identical)),
        DecisionInput::Changes(model) => model,
    };

    let required = required_change(model);
    let declared = match old.classify(new) {
        Ok(declared) => declared,
        Err(_) if required.rank() > ChangeType::Patch.rank() => {
            return Err(SemgateError::ChangesOnNonIncreasingVersion {
                old: old.to_string(),
                new: new.to_string(),
                declared: ChangeType::Patch.to_string(),
                required: required.to_string(),
            }
            .into());
        }
        Err(err) => return Err(err),
    };

    if old.major() == 0 && new.major() == 0 {
        return Ok(Verdict::Pass(PassReason::PreRelease));
    }

    if required.rank() > declared.rank() {
        return Ok(Verdict::Fail {
            old: old.clone(),
            new: new.clone(),
            declared,
            required,
        });
    }

    Ok(Verdict::Pass(PassReason::Compliant))
}
