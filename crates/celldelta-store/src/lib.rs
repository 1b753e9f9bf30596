//! celldelta store - durable snapshots and raw input
//!
//! Provides:
//! - SQLite ledger with an embedded migrations framework
//! - Content-addressable storage (CAS) for canonical snapshot bodies
//! - [`SqliteSnapshotStore`], the durable `SnapshotStore`
//! - [`CsvFileSource`], the OpenCellID CSV `RawSource`

pub mod cas;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod snapshot;
pub mod source;

// Re-export key types
pub use errors::Result;
pub use repo::SqliteSnapshotStore;
pub use source::CsvFileSource;
