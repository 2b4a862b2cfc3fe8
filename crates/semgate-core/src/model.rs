//! API change model produced by a comparator.
//!
//! Records are kept sorted (class name, then member kind/name/descriptor) so
//! that reports and the required bump are deterministic.

use crate::version::ChangeType;
use serde::{Deserialize, Serialize};

/// Whether an element was added, removed, or changed in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Added,
    Removed,
    Modified,
}

impl ChangeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "NEW",
            ChangeStatus::Removed => "REMOVED",
            ChangeStatus::Modified => "MODIFIED",
        }
    }

    /// Text-report marker: `+++` added, `---` removed, `***` modified
    pub fn marker(&self) -> &'static str {
        match self {
            ChangeStatus::Added => "+++",
            ChangeStatus::Removed => "---",
            ChangeStatus::Modified => "***",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Class-level attribute (modifiers, superclass, interfaces)
    Class,
    Field,
    Method,
}

impl MemberKind {
    pub fn label(&self) -> &'static str {
        match self {
            MemberKind::Class => "CLASS",
            MemberKind::Field => "FIELD",
            MemberKind::Method => "METHOD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberChange {
    pub kind: MemberKind,
    pub name: String,
    /// JVM descriptor, empty for class-level records
    pub descriptor: String,
    pub status: ChangeStatus,
    pub severity: ChangeType,
    /// Short human explanation, e.g. "became final"
    pub reason: String,
}

impl MemberChange {
    /// Display form: `run(I)V` for methods, `count:I` for fields
    pub fn signature(&self) -> String {
        match self.kind {
            MemberKind::Class => self.name.clone(),
            MemberKind::Field => format!("{}:{}", self.name, self.descriptor),
            MemberKind::Method => format!("{}{}", self.name, self.descriptor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassChange {
    /// Fully qualified, dotted class name
    pub name: String,
    pub status: ChangeStatus,
    /// Severity of the class-level change itself (not its members)
    pub severity: ChangeType,
    pub members: Vec<MemberChange>,
}

impl ClassChange {
    /// Most severe change carried by this class or any member
    pub fn max_severity(&self) -> ChangeType {
        self.members
            .iter()
            .map(|m| m.severity)
            .fold(self.severity, ChangeType::max)
    }
}

/// Structured comparator output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeModel {
    classes: Vec<ClassChange>,
}

impl ChangeModel {
    /// Build a model, sorting records into canonical order
    pub fn new(mut classes: Vec<ClassChange>) -> Self {
        for class in &mut classes {
            class.members.sort_by(|a, b| {
                (a.kind, &a.name, &a.descriptor).cmp(&(b.kind, &b.name, &b.descriptor))
            });
        }
        classes.sort_by(|a, b| a.name.cmp(&b.name));
        Self { classes }
    }

    pub fn classes(&self) -> &[ClassChange] {
        &self.classes
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Total number of class and member records
    pub fn change_count(&self) -> usize {
        self.classes.iter().map(|c| 1 + c.members.len()).sum()
    }
}
