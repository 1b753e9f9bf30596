//! SQLite repository implementation
//!
//! [`SqliteSnapshotStore`] keeps ledger metadata in SQLite and snapshot
//! bodies in a filesystem CAS.

use crate::cas::FsStore;
use crate::db;
use crate::errors::Result;
use crate::migrations::apply_migrations;
use crate::snapshot::{commit_snapshot, fetch_latest_meta, fetch_ledger, fetch_meta, load_snapshot};
use celldelta_core::snapshot::Snapshot;
use celldelta_core::store::{CreateOutcome, LedgerEntry, SnapshotStore};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Durable snapshot store: SQLite ledger + filesystem CAS
pub struct SqliteSnapshotStore {
    conn: Connection,
    cas: FsStore,
}

impl SqliteSnapshotStore {
    /// Open (creating if needed) a store with its ledger at `db_path` and
    /// blobs under `cas_root`; pending migrations are applied
    pub fn open(db_path: impl AsRef<Path>, cas_root: impl Into<PathBuf>) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| crate::errors::io_error("open_db", e))?;
            }
        }
        let conn = db::open(db_path)?;
        Self::from_connection(conn, cas_root)
    }

    /// Store with an in-memory ledger (blobs still go to `cas_root`)
    pub fn open_in_memory(cas_root: impl Into<PathBuf>) -> Result<Self> {
        Self::from_connection(db::open_in_memory()?, cas_root)
    }

    fn from_connection(mut conn: Connection, cas_root: impl Into<PathBuf>) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn,
            cas: FsStore::new(cas_root),
        })
    }

    pub fn cas(&self) -> &FsStore {
        &self.cas
    }

    /// The underlying connection, for inspection in tests and tooling
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn get_latest(&self) -> Result<Option<Snapshot>> {
        fetch_latest_meta(&self.conn)?
            .map(|meta| load_snapshot(&self.cas, meta))
            .transpose()
    }

    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        fetch_meta(&self.conn, snapshot_id)?
            .map(|meta| load_snapshot(&self.cas, meta))
            .transpose()
    }

    fn create_if_absent(&mut self, snapshot: &Snapshot) -> Result<CreateOutcome> {
        commit_snapshot(&mut self.conn, &self.cas, snapshot)
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        fetch_ledger(&self.conn)
    }
}
