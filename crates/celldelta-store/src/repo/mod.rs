//! Repository layer
//!
//! Bridges the core `SnapshotStore` seam to SQLite + CAS persistence.

pub mod sqlite_repo;

pub use sqlite_repo::SqliteSnapshotStore;
