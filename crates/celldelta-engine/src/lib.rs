//! celldelta engine - run orchestration
//!
//! Coordinates the core pipeline (normalize, scope, dedupe, build, diff,
//! report) with a raw source and a snapshot store supplied by the caller.

pub mod commands;

pub use commands::diff::diff_snapshots;
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::ingest::{run_ingest, RunOutcome, RunReport};
