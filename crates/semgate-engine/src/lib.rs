//! semgate engine - orchestration layer
//!
//! Coordinates artifact staging (`semgate-store`) with the decision core
//! (`semgate-core`) behind whichever `ApiComparator` the caller supplies.

pub mod commands;

pub use commands::check::{run_check, CheckOutcome, CheckRequest, ReportTargets};
