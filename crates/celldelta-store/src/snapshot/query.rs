//! Read-only snapshot query operations.

use crate::cas::FsStore;
use crate::errors::{from_rusqlite, Result};
use celldelta_core::errors::CellDeltaError;
use celldelta_core::snapshot::{Snapshot, SnapshotMeta};
use celldelta_core::store::LedgerEntry;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};

const META_COLUMNS: &str =
    "s.snapshot_id, s.format_version, s.created_at, s.source_descriptor, s.record_count";

/// A ledger row as stored, before timestamp parsing
struct StoredMeta {
    snapshot_id: String,
    format_version: String,
    created_at: String,
    source_descriptor: String,
    record_count: i64,
}

impl StoredMeta {
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            snapshot_id: row.get(offset)?,
            format_version: row.get(offset + 1)?,
            created_at: row.get(offset + 2)?,
            source_descriptor: row.get(offset + 3)?,
            record_count: row.get(offset + 4)?,
        })
    }

    fn into_meta(self) -> Result<SnapshotMeta> {
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| CellDeltaError::StoreUnavailable {
                op: "read_ledger".to_string(),
                message: format!(
                    "invalid created_at '{}' for snapshot {}: {}",
                    self.created_at, self.snapshot_id, e
                ),
            })?
            .with_timezone(&Utc);

        Ok(SnapshotMeta {
            snapshot_id: self.snapshot_id,
            created_at,
            source_descriptor: self.source_descriptor,
            record_count: usize::try_from(self.record_count).unwrap_or(0),
            format_version: self.format_version,
        })
    }
}

/// Fetch ledger metadata for one snapshot.
///
/// # Errors
///
/// `StoreUnavailable` if the query fails or the row is malformed.
pub fn fetch_meta(conn: &Connection, snapshot_id: &str) -> Result<Option<SnapshotMeta>> {
    let sql = format!("SELECT {} FROM snapshots s WHERE s.snapshot_id = ?1", META_COLUMNS);
    conn.query_row(&sql, [snapshot_id], |row| StoredMeta::from_row(row, 0))
        .optional()
        .map_err(|e| from_rusqlite("get", e))?
        .map(StoredMeta::into_meta)
        .transpose()
}

/// Fetch ledger metadata of the latest snapshot in the run sequence.
///
/// # Errors
///
/// `StoreUnavailable` if the query fails or the row is malformed.
pub fn fetch_latest_meta(conn: &Connection) -> Result<Option<SnapshotMeta>> {
    let sql = format!(
        "SELECT {} FROM snapshot_sequence q JOIN snapshots s ON s.snapshot_id = q.snapshot_id \
         ORDER BY q.seq DESC LIMIT 1",
        META_COLUMNS
    );
    conn.query_row(&sql, [], |row| StoredMeta::from_row(row, 0))
        .optional()
        .map_err(|e| from_rusqlite("get_latest", e))?
        .map(StoredMeta::into_meta)
        .transpose()
}

/// Fetch the whole run sequence, oldest first.
///
/// # Errors
///
/// `StoreUnavailable` if the query fails or a row is malformed.
pub fn fetch_ledger(conn: &Connection) -> Result<Vec<LedgerEntry>> {
    let sql = format!(
        "SELECT q.seq, {} FROM snapshot_sequence q JOIN snapshots s ON s.snapshot_id = q.snapshot_id \
         ORDER BY q.seq ASC",
        META_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| from_rusqlite("list", e))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, StoredMeta::from_row(row, 1)?)))
        .map_err(|e| from_rusqlite("list", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| from_rusqlite("list", e))?;

    rows.into_iter()
        .map(|(seq, stored)| {
            Ok(LedgerEntry {
                seq: u64::try_from(seq).unwrap_or(0),
                meta: stored.into_meta()?,
            })
        })
        .collect()
}

/// Load a snapshot body from CAS and verify it against its ledger id.
///
/// # Errors
///
/// - `StoreUnavailable` if the blob is missing or unreadable
/// - `IntegrityViolation` if the blob does not hash to the snapshot id
pub fn load_snapshot(cas: &FsStore, meta: SnapshotMeta) -> Result<Snapshot> {
    let bytes = cas.read(&meta.snapshot_id)?;
    Snapshot::restore(meta, &bytes)
}
