//! Snapshot persistence layer.
//!
//! Snapshot bodies go to content-addressable storage (CAS), metadata and
//! the run sequence to the SQLite ledger.
//!
//! ## Responsibilities
//!
//! - Persist canonical snapshot bytes to CAS (digest == snapshot id)
//! - Ledger rows in `snapshots`, run order in `snapshot_sequence`
//! - Atomic `create_if_absent` (IMMEDIATE transaction, `INSERT OR IGNORE`)
//! - Restore snapshots with an integrity re-check
//!
//! ## Non-Responsibilities
//!
//! - Snapshot construction (handled by `celldelta-core`)
//! - Orchestration (handled by `celldelta-engine`)

pub mod persist;
pub mod query;

// Re-export primary types
pub use persist::{commit_snapshot, persist_snapshot_to_cas};
pub use query::{fetch_latest_meta, fetch_ledger, fetch_meta, load_snapshot};
