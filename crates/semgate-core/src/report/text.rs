//! Plain-text report renderer.

use super::ReportHeader;
use crate::model::{ChangeModel, ClassChange, MemberChange};
use crate::version::ChangeType;

/// Render the plain-text report.
///
/// Layout: four header lines, a blank line, then one block per changed
/// class. A `!` after the marker flags changes that require a MAJOR bump.
pub fn render_text(header: &ReportHeader, model: &ChangeModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("Old jar:     {}\n", header.old_archive));
    out.push_str(&format!("Old version: {}\n", header.old_version));
    out.push_str(&format!("New jar:     {}\n", header.new_archive));
    out.push_str(&format!("New version: {}\n", header.new_version));
    out.push('\n');

    if model.is_empty() {
        out.push_str("No changes.\n");
        return out;
    }

    for class in model.classes() {
        render_class(&mut out, class);
    }
    out
}

fn breaking_flag(severity: ChangeType) -> &'static str {
    if severity == ChangeType::Major {
        "!"
    } else {
        " "
    }
}

fn render_class(out: &mut String, class: &ClassChange) {
    out.push_str(&format!(
        "{}{} {} CLASS: {} (requires {})\n",
        class.status.marker(),
        breaking_flag(class.max_severity()),
        class.status.label(),
        class.name,
        class.max_severity(),
    ));
    for member in &class.members {
        render_member(out, member);
    }
}

fn render_member(out: &mut String, member: &MemberChange) {
    out.push_str(&format!(
        "\t{}{} {} {}: {} [{}] ({})\n",
        member.status.marker(),
        breaking_flag(member.severity),
        member.status.label(),
        member.kind.label(),
        member.signature(),
        member.severity,
        member.reason,
    ));
}
