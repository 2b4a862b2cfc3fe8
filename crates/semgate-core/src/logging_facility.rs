//! Structured logging facility for semgate
//!
//! This module provides:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! Logs go to stderr next to the `INFO:`/`ERROR:` diagnostics, so nothing is
//! emitted unless `RUST_LOG` asks for it.
//!
//! # Usage
//!
//! ```rust
//! use semgate_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
