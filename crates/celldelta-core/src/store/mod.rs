//! Snapshot store seam
//!
//! The engine reads the previous snapshot and persists the current one
//! through [`SnapshotStore`]. The store is passed explicitly; there is no
//! global instance. `celldelta-store` provides the SQLite + CAS backend,
//! [`MemorySnapshotStore`] serves tests and embedding.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::snapshot::{Snapshot, SnapshotMeta};

pub use memory::MemorySnapshotStore;

/// Result of [`SnapshotStore::create_if_absent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    /// The snapshot was not stored before
    Created,
    /// A snapshot with the same id already existed; nothing was rewritten
    AlreadyExists,
}

/// One row of a store's run ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the sequence, starting at 1
    pub seq: u64,
    pub meta: SnapshotMeta,
}

/// Durable home of snapshots
///
/// "Latest" means the snapshot of the most recent run. Recording a snapshot
/// that is already latest leaves the sequence alone; recording an older one
/// again (A, B, A) appends it so it becomes latest without duplicating its
/// content.
pub trait SnapshotStore {
    /// The snapshot recorded last, if any
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on backend failure, `IntegrityViolation` if the
    /// stored bytes no longer match their id.
    fn get_latest(&self) -> Result<Option<Snapshot>>;

    /// Look up a snapshot by id
    ///
    /// # Errors
    ///
    /// Same as [`SnapshotStore::get_latest`].
    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>>;

    /// Persist a snapshot unless one with its id exists, and record it as
    /// latest
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on backend failure. Nothing is left half-written.
    fn create_if_absent(&mut self, snapshot: &Snapshot) -> Result<CreateOutcome>;

    /// Run ledger, oldest first
    ///
    /// # Errors
    ///
    /// `StoreUnavailable` on backend failure.
    fn list(&self) -> Result<Vec<LedgerEntry>>;
}
