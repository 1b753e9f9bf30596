//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and the snapshot store.

pub mod diff;
pub mod engine_command;
pub mod ingest;
