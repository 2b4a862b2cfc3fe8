//! Machine-readable JSON report.

use super::ReportHeader;
use crate::errors::Result;
use crate::model::ChangeModel;
use crate::policy::required_change;
use crate::version::ChangeType;
use serde::Serialize;

/// Schema version of the JSON report document
pub const JSON_REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct JsonReport<'a> {
    report_schema_version: u32,
    header: &'a ReportHeader,
    required_change: ChangeType,
    changes: &'a ChangeModel,
}

/// Render the header and change model as pretty-printed JSON.
///
/// # Errors
///
/// `ERR_SERIALIZATION` if serde_json fails.
pub fn render_json(header: &ReportHeader, model: &ChangeModel) -> Result<String> {
    let report = JsonReport {
        report_schema_version: JSON_REPORT_SCHEMA_VERSION,
        header,
        required_change: required_change(model),
        changes: model,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
