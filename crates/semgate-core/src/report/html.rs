//! HTML report renderer.

use super::ReportHeader;
use crate::model::{ChangeModel, ClassChange};
use crate::version::ChangeType;

const STYLE: &str = "body{font-family:sans-serif;margin:2em}\
table{border-collapse:collapse;margin-bottom:1.5em}\
td,th{border:1px solid #ccc;padding:0.3em 0.6em;text-align:left}\
.added{color:#1a7f37}.removed{color:#cf222e}.modified{color:#9a6700}\
.major{font-weight:bold}";

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a self-contained HTML page for the change model.
pub fn render_html(header: &ReportHeader, model: &ChangeModel) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>API compatibility report</title>\n");
    out.push_str(&format!("<style>{}</style>\n", STYLE));
    out.push_str("</head>\n<body>\n<h1>API compatibility report</h1>\n");

    out.push_str("<table>\n");
    for (label, value) in [
        ("Old archive", &header.old_archive),
        ("Old version", &header.old_version),
        ("New archive", &header.new_archive),
        ("New version", &header.new_version),
    ] {
        out.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>\n",
            label,
            escape_html(value)
        ));
    }
    out.push_str("</table>\n");

    if model.is_empty() {
        out.push_str("<p>No changes.</p>\n");
    } else {
        for class in model.classes() {
            render_class(&mut out, class);
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn css_class(status_label: &str, severity: ChangeType) -> String {
    let mut class = status_label.to_ascii_lowercase();
    if severity == ChangeType::Major {
        class.push_str(" major");
    }
    class
}

fn render_class(out: &mut String, class: &ClassChange) {
    out.push_str(&format!(
        "<h2 class=\"{}\">{} {} <small>(requires {})</small></h2>\n",
        css_class(class.status.label(), class.max_severity()),
        class.status.label(),
        escape_html(&class.name),
        class.max_severity(),
    ));

    if class.members.is_empty() {
        return;
    }

    out.push_str("<table>\n<tr><th>Status</th><th>Kind</th><th>Element</th><th>Requires</th><th>Reason</th></tr>\n");
    for member in &class.members {
        out.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
            css_class(member.status.label(), member.severity),
            member.status.label(),
            member.kind.label(),
            escape_html(&member.signature()),
            member.severity,
            escape_html(&member.reason),
        ));
    }
    out.push_str("</table>\n");
}
