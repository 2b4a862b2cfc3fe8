//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Artifact identifiers
pub const FIELD_SIDE: &str = "side";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_PATH: &str = "path";
pub const FIELD_VERSION: &str = "version";

// Comparison sizes and outcomes
pub const FIELD_CLASS_COUNT: &str = "class_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";
pub const FIELD_EXCLUSION_COUNT: &str = "exclusion_count";
pub const FIELD_DECLARED: &str = "declared";
pub const FIELD_REQUIRED: &str = "required";
pub const FIELD_VERDICT: &str = "verdict";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Artifact sides
pub const SIDE_OLD: &str = "old";
pub const SIDE_NEW: &str = "new";
