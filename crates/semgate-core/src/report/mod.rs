//! Human-readable renderings of a change model.
//!
//! Renderers are pure (`&ChangeModel -> String`); writing the files is the
//! engine's job. Reports never influence the verdict.

pub mod html;
pub mod json;
pub mod text;

pub use html::render_html;
pub use json::render_json;
pub use text::render_text;

use serde::Serialize;

/// Artifact identity printed at the top of every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHeader {
    pub old_archive: String,
    pub old_version: String,
    pub new_archive: String,
    pub new_version: String,
}
