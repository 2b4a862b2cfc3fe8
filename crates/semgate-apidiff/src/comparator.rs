//! Surface-level API comparison.
//!
//! Compares the visible classes, fields and methods of two jars and grades
//! every difference on the NONE < PATCH < MINOR < MAJOR scale. This is a
//! surface check: it does not look at code, generics signatures, or
//! annotations.

use crate::classfile::{access, MemberInfo};
use crate::exclusions::ExclusionMatcher;
use crate::surface::{load_jar, ClassSurface, JarSurface};
use semgate_core::errors::Result;
use semgate_core::{
    log_op_end, log_op_error, log_op_start, ApiComparator, ChangeModel, ChangeStatus, ChangeType,
    ClassChange, ExclusionSet, MemberChange, MemberKind,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

/// [`ApiComparator`] over the public member surface of class files
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceComparator;

impl SurfaceComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare two already-loaded surfaces
    pub fn compare_surfaces(
        &self,
        old: &JarSurface,
        new: &JarSurface,
        matcher: &ExclusionMatcher,
    ) -> ChangeModel {
        let names: BTreeSet<&str> = old.names().chain(new.names()).collect();
        let classes = names
            .into_iter()
            .filter(|name| !matcher.excludes_class(name))
            .filter_map(|name| diff_class(old.get(name), new.get(name), matcher))
            .collect();
        ChangeModel::new(classes)
    }
}

impl ApiComparator for SurfaceComparator {
    fn compare(
        &self,
        old_archive: &Path,
        new_archive: &Path,
        exclusions: &ExclusionSet,
    ) -> Result<ChangeModel> {
        let start = Instant::now();
        log_op_start!("compare_surfaces", exclusion_count = exclusions.len());

        let result = ExclusionMatcher::compile(exclusions).and_then(|matcher| {
            let old = load_jar(old_archive)?;
            let new = load_jar(new_archive)?;
            tracing::debug!(
                old_classes = old.len(),
                new_classes = new.len(),
                "loaded jar surfaces"
            );
            Ok(self.compare_surfaces(&old, &new, &matcher))
        });

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(model) => {
                log_op_end!(
                    "compare_surfaces",
                    duration_ms = duration_ms,
                    class_count = model.classes().len(),
                    change_count = model.change_count()
                );
                Ok(model)
            }
            Err(err) => {
                log_op_error!("compare_surfaces", err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }
}

fn diff_class(
    old: Option<&ClassSurface>,
    new: Option<&ClassSurface>,
    matcher: &ExclusionMatcher,
) -> Option<ClassChange> {
    let old_visible = old.filter(|c| c.is_visible());
    let new_visible = new.filter(|c| c.is_visible());

    match (old_visible, new_visible) {
        (None, None) => None,
        (Some(o), None) => Some(ClassChange {
            name: o.name.clone(),
            status: ChangeStatus::Removed,
            severity: ChangeType::Major,
            members: match new {
                Some(_) => vec![class_record(
                    "access",
                    ChangeStatus::Modified,
                    ChangeType::Major,
                    "class is no longer public",
                )],
                None => Vec::new(),
            },
        }),
        (None, Some(n)) => Some(ClassChange {
            name: n.name.clone(),
            status: ChangeStatus::Added,
            severity: ChangeType::Minor,
            members: match old {
                Some(_) => vec![class_record(
                    "access",
                    ChangeStatus::Modified,
                    ChangeType::Minor,
                    "class became public",
                )],
                None => Vec::new(),
            },
        }),
        (Some(o), Some(n)) => {
            let mut members = class_attribute_changes(o, n);
            members.extend(field_changes(o, n, matcher));
            members.extend(method_changes(o, n, matcher));
            if members.is_empty() && o.digest == n.digest {
                return None;
            }
            Some(ClassChange {
                name: n.name.clone(),
                status: ChangeStatus::Modified,
                severity: ChangeType::Patch,
                members,
            })
        }
    }
}

fn class_record(
    name: &str,
    status: ChangeStatus,
    severity: ChangeType,
    reason: impl Into<String>,
) -> MemberChange {
    MemberChange {
        kind: MemberKind::Class,
        name: name.to_string(),
        descriptor: String::new(),
        status,
        severity,
        reason: reason.into(),
    }
}

fn class_attribute_changes(old: &ClassSurface, new: &ClassSurface) -> Vec<MemberChange> {
    let mut out = Vec::new();

    let was_interface = old.has(access::INTERFACE);
    let is_interface = new.has(access::INTERFACE);
    if was_interface != is_interface {
        let reason = if is_interface {
            "class became an interface"
        } else {
            "interface became a class"
        };
        out.push(class_record("kind", ChangeStatus::Modified, ChangeType::Major, reason));
    } else if !is_interface {
        if !old.has(access::FINAL) && new.has(access::FINAL) {
            out.push(class_record(
                "final",
                ChangeStatus::Modified,
                ChangeType::Major,
                "class became final",
            ));
        }
        if !old.has(access::ABSTRACT) && new.has(access::ABSTRACT) {
            out.push(class_record(
                "abstract",
                ChangeStatus::Modified,
                ChangeType::Major,
                "class became abstract",
            ));
        }
    }

    if old.super_class != new.super_class {
        out.push(class_record(
            "superclass",
            ChangeStatus::Modified,
            ChangeType::Major,
            format!(
                "superclass changed from {} to {}",
                old.super_class.as_deref().unwrap_or("none"),
                new.super_class.as_deref().unwrap_or("none")
            ),
        ));
    }

    for removed in old.interfaces.difference(&new.interfaces) {
        out.push(class_record(
            removed,
            ChangeStatus::Removed,
            ChangeType::Major,
            "interface no longer implemented",
        ));
    }
    for added in new.interfaces.difference(&old.interfaces) {
        out.push(class_record(
            added,
            ChangeStatus::Added,
            ChangeType::Minor,
            "interface implemented",
        ));
    }

    out
}

fn is_visible_member(member: &MemberInfo, kind: MemberKind) -> bool {
    let exposed = member.has(access::PUBLIC) || member.has(access::PROTECTED);
    let bridge = kind == MemberKind::Method && member.has(access::BRIDGE);
    exposed && !member.has(access::SYNTHETIC) && !bridge
}

fn member_record(
    kind: MemberKind,
    member: &MemberInfo,
    status: ChangeStatus,
    severity: ChangeType,
    reason: impl Into<String>,
) -> MemberChange {
    MemberChange {
        kind,
        name: member.name.clone(),
        descriptor: member.descriptor.clone(),
        status,
        severity,
        reason: reason.into(),
    }
}

/// Incompatible flag changes on a member visible on both sides
fn modifier_changes(kind: MemberKind, old: &MemberInfo, new: &MemberInfo) -> Vec<(ChangeType, String)> {
    let mut out = Vec::new();
    if old.has(access::PUBLIC) && !new.has(access::PUBLIC) {
        out.push((ChangeType::Major, "visibility reduced from public to protected".to_string()));
    }
    if !old.has(access::PUBLIC) && new.has(access::PUBLIC) {
        out.push((ChangeType::Minor, "visibility widened from protected to public".to_string()));
    }
    if old.has(access::STATIC) != new.has(access::STATIC) {
        let reason = if new.has(access::STATIC) {
            "became static"
        } else {
            "is no longer static"
        };
        out.push((ChangeType::Major, reason.to_string()));
    }
    if !old.has(access::FINAL) && new.has(access::FINAL) {
        out.push((ChangeType::Major, "became final".to_string()));
    }
    if kind == MemberKind::Method && !old.has(access::ABSTRACT) && new.has(access::ABSTRACT) {
        out.push((ChangeType::Major, "became abstract".to_string()));
    }
    out
}

fn combine(changes: Vec<(ChangeType, String)>) -> Option<(ChangeType, String)> {
    let severity = changes.iter().map(|(s, _)| *s).max()?;
    let reason = changes
        .into_iter()
        .map(|(_, r)| r)
        .collect::<Vec<_>>()
        .join("; ");
    Some((severity, reason))
}

fn field_changes(
    old: &ClassSurface,
    new: &ClassSurface,
    matcher: &ExclusionMatcher,
) -> Vec<MemberChange> {
    let kind = MemberKind::Field;
    let visible = |class: &ClassSurface, name: &str| -> Option<MemberInfo> {
        class
            .fields
            .get(name)
            .filter(|f| is_visible_member(f, kind))
            .cloned()
    };
    let names: BTreeSet<&String> = old.fields.keys().chain(new.fields.keys()).collect();

    let mut out = Vec::new();
    for name in names {
        if matcher.excludes_member(&new.name, name) {
            continue;
        }
        match (visible(old, name.as_str()), visible(new, name.as_str())) {
            (None, None) => {}
            (Some(o), None) => out.push(member_record(
                kind,
                &o,
                ChangeStatus::Removed,
                ChangeType::Major,
                if new.fields.contains_key(name) {
                    "no longer visible"
                } else {
                    "removed"
                },
            )),
            (None, Some(n)) => out.push(member_record(
                kind,
                &n,
                ChangeStatus::Added,
                ChangeType::Minor,
                "added",
            )),
            (Some(o), Some(n)) => {
                let mut changes = Vec::new();
                if o.descriptor != n.descriptor {
                    changes.push((
                        ChangeType::Major,
                        format!("type changed from {} to {}", o.descriptor, n.descriptor),
                    ));
                }
                changes.extend(modifier_changes(kind, &o, &n));
                if let Some((severity, reason)) = combine(changes) {
                    out.push(member_record(kind, &n, ChangeStatus::Modified, severity, reason));
                }
            }
        }
    }
    out
}

fn method_changes(
    old: &ClassSurface,
    new: &ClassSurface,
    matcher: &ExclusionMatcher,
) -> Vec<MemberChange> {
    let kind = MemberKind::Method;
    let visible = |class: &ClassSurface, key: &(String, String)| -> Option<MemberInfo> {
        class
            .methods
            .get(key)
            .filter(|m| is_visible_member(m, kind))
            .cloned()
    };
    let keys: BTreeSet<&(String, String)> =
        old.methods.keys().chain(new.methods.keys()).collect();

    let mut out = Vec::new();
    for key in keys {
        if matcher.excludes_member(&new.name, &key.0) {
            continue;
        }
        match (visible(old, key), visible(new, key)) {
            (None, None) => {}
            (Some(o), None) => out.push(member_record(
                kind,
                &o,
                ChangeStatus::Removed,
                ChangeType::Major,
                if new.methods.contains_key(key) {
                    "no longer visible"
                } else {
                    "removed"
                },
            )),
            (None, Some(n)) => {
                let (severity, reason) = if n.has(access::ABSTRACT) {
                    (ChangeType::Major, "abstract method added")
                } else {
                    (ChangeType::Minor, "added")
                };
                out.push(member_record(kind, &n, ChangeStatus::Added, severity, reason));
            }
            (Some(o), Some(n)) => {
                if let Some((severity, reason)) = combine(modifier_changes(kind, &o, &n)) {
                    out.push(member_record(kind, &n, ChangeStatus::Modified, severity, reason));
                }
            }
        }
    }
    out
}
