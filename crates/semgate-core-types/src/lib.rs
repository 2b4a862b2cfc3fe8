//! Core types shared across semgate facilities
//!
//! This crate holds the canonical field keys and event names used by the
//! error and logging facilities so every crate in the workspace emits the
//! same structured schema.

pub mod schema;
