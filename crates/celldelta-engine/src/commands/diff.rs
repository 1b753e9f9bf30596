//! Ad-hoc comparison of two stored snapshots.

use std::time::Instant;

use celldelta_core::errors::{CellDeltaError, Result};
use celldelta_core::snapshot::Snapshot;
use celldelta_core::store::SnapshotStore;
use celldelta_core::{diff, log_op_end, log_op_error, log_op_start, DiffResult};

/// Diff two snapshots already held by `store`
///
/// # Errors
///
/// `SnapshotNotFound` naming the first id the store does not know, or any
/// store error.
pub fn diff_snapshots(
    store: &dyn SnapshotStore,
    previous_id: &str,
    current_id: &str,
) -> Result<DiffResult> {
    let start = Instant::now();
    log_op_start!("diff_snapshots", previous_id = previous_id, current_id = current_id);

    let result = load(store, previous_id).and_then(|previous| {
        let current = load(store, current_id)?;
        Ok(diff(Some(&previous), &current))
    });

    match &result {
        Ok(d) => {
            log_op_end!(
                "diff_snapshots",
                duration_ms = start.elapsed().as_millis() as u64,
                added = d.added.len(),
                removed = d.removed.len(),
                modified = d.modified.len()
            );
        }
        Err(err) => {
            log_op_error!(
                "diff_snapshots",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn load(store: &dyn SnapshotStore, snapshot_id: &str) -> Result<Snapshot> {
    store
        .get(snapshot_id)?
        .ok_or_else(|| CellDeltaError::SnapshotNotFound {
            snapshot_id: snapshot_id.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use celldelta_core::model::Record;
    use celldelta_core::{build, MemorySnapshotStore};

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = MemorySnapshotStore::new();
        let snap = build(vec![Record::at(1_000, 1_000)], "t").unwrap();
        store.create_if_absent(&snap).unwrap();

        match diff_snapshots(&store, snap.snapshot_id(), "missing") {
            Err(CellDeltaError::SnapshotNotFound { snapshot_id }) => {
                assert_eq!(snapshot_id, "missing")
            }
            other => panic!("expected SnapshotNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_diff_of_stored_pair() {
        let mut store = MemorySnapshotStore::new();
        let a = build(vec![Record::at(1_000, 1_000)], "a").unwrap();
        let b = build(vec![Record::at(1_000, 1_000), Record::at(9_000, 9_000)], "b").unwrap();
        store.create_if_absent(&a).unwrap();
        store.create_if_absent(&b).unwrap();

        let result = diff_snapshots(&store, a.snapshot_id(), b.snapshot_id()).unwrap();
        assert_eq!(result.added.len(), 1);
        assert_eq!(result.unchanged.len(), 1);
    }
}
