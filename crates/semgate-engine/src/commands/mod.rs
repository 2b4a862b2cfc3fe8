//! Command orchestration layer.
//!
//! One command per user-facing operation.

pub mod check;
