//! Snapshot persistence operations.

use crate::cas::FsStore;
use crate::errors::{from_rusqlite, Result};
use celldelta_core::errors::CellDeltaError;
use celldelta_core::snapshot::{Snapshot, SnapshotMeta};
use celldelta_core::store::CreateOutcome;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Persist a snapshot's canonical bytes to content-addressable storage.
///
/// Idempotent: writing the same snapshot twice succeeds and returns the
/// same digest.
///
/// ## Errors
///
/// - `StoreUnavailable`: CAS write failed
/// - `IntegrityViolation`: the written bytes do not hash to the snapshot id,
///   or a different blob is already filed under it
pub fn persist_snapshot_to_cas(store: &FsStore, snapshot: &Snapshot) -> Result<String> {
    let bytes = snapshot.canonical_bytes()?;
    let digest = store.write(&bytes)?;

    if digest != snapshot.snapshot_id() {
        return Err(CellDeltaError::IntegrityViolation {
            snapshot_id: snapshot.snapshot_id().to_string(),
            computed: digest,
        });
    }

    tracing::debug!(
        snapshot_id = %digest,
        size_bytes = bytes.len(),
        "Persisted snapshot to CAS"
    );

    Ok(digest)
}

/// Insert the ledger row unless it exists. Returns whether a row was added.
fn insert_ledger_entry(tx: &Transaction, meta: &SnapshotMeta) -> Result<bool> {
    let changed = tx
        .execute(
            r#"
            INSERT OR IGNORE INTO snapshots (
                snapshot_id,
                format_version,
                created_at,
                source_descriptor,
                record_count
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            rusqlite::params![
                meta.snapshot_id,
                meta.format_version,
                meta.created_at.to_rfc3339(),
                meta.source_descriptor,
                meta.record_count as i64,
            ],
        )
        .map_err(|e| from_rusqlite("create_if_absent", e))?;

    Ok(changed == 1)
}

/// Append to the run sequence unless the snapshot is already latest.
fn append_sequence(tx: &Transaction, snapshot_id: &str) -> Result<bool> {
    let latest: Option<String> = tx
        .query_row(
            "SELECT snapshot_id FROM snapshot_sequence ORDER BY seq DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| from_rusqlite("create_if_absent", e))?;

    if latest.as_deref() == Some(snapshot_id) {
        return Ok(false);
    }

    tx.execute(
        "INSERT INTO snapshot_sequence (snapshot_id, recorded_at) VALUES (?1, ?2)",
        rusqlite::params![snapshot_id, chrono::Utc::now().to_rfc3339()],
    )
    .map_err(|e| from_rusqlite("create_if_absent", e))?;

    Ok(true)
}

/// Commit a snapshot to both CAS and ledger.
///
/// 1. Persist canonical bytes to CAS (idempotent, content-verified)
/// 2. In one IMMEDIATE transaction: `INSERT OR IGNORE` the ledger row and
///    append to the run sequence if the snapshot is not already latest
///
/// A crash between the two steps leaves at most an unreferenced CAS blob,
/// never a ledger row without content.
///
/// ## Errors
///
/// - `StoreUnavailable`: CAS or database error
/// - `IntegrityViolation`: CAS content mismatch
pub fn commit_snapshot(
    conn: &mut Connection,
    cas: &FsStore,
    snapshot: &Snapshot,
) -> Result<CreateOutcome> {
    persist_snapshot_to_cas(cas, snapshot)?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| from_rusqlite("create_if_absent", e))?;

    let inserted = insert_ledger_entry(&tx, &snapshot.meta())?;
    let appended = append_sequence(&tx, snapshot.snapshot_id())?;

    tx.commit()
        .map_err(|e| from_rusqlite("create_if_absent", e))?;

    tracing::debug!(
        snapshot_id = %snapshot.snapshot_id(),
        inserted,
        appended,
        "Committed snapshot ledger entry"
    );

    Ok(if inserted {
        CreateOutcome::Created
    } else {
        CreateOutcome::AlreadyExists
    })
}
