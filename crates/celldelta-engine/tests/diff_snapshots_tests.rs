//! Integration tests for diffing stored snapshots by id.

use celldelta_core::errors::{CellDeltaError, ExError, ExErrorKind};
use celldelta_core::model::MemorySource;
use celldelta_core::scope::IngestScope;
use celldelta_core_types::correlation::RunContext;
use celldelta_engine::{diff_snapshots, run_ingest};
use celldelta_store::SqliteSnapshotStore;
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteSnapshotStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteSnapshotStore::open(
        temp_dir.path().join("ledger.db"),
        temp_dir.path().join("cas"),
    )
    .unwrap();
    (temp_dir, store)
}

fn ingest_lines(store: &mut SqliteSnapshotStore, lines: &[&[&str]]) -> String {
    let source = MemorySource::from_lines("mem:test", lines);
    run_ingest(&source, store, &IngestScope::all(), &RunContext::new())
        .unwrap()
        .snapshot
        .snapshot_id()
        .to_string()
}

#[test]
fn test_diff_between_historical_runs() {
    let (_dir, mut store) = setup();
    let old = ingest_lines(
        &mut store,
        &[&["GSM", "262", "2", "1", "7", "0", "13.4", "52.5", "", "", "", "", "", "-90"]],
    );
    let new = ingest_lines(
        &mut store,
        &[&["GSM", "262", "2", "1", "7", "0", "13.4", "52.5", "", "", "", "", "", "-70"]],
    );

    let result = diff_snapshots(&store, &old, &new).unwrap();
    assert_eq!(result.modified.len(), 1);
    assert_eq!(result.modified[0].previous.signal_quality, Some(-90));
    assert_eq!(result.modified[0].current.signal_quality, Some(-70));

    // Reverse direction mirrors the change
    let reverse = diff_snapshots(&store, &new, &old).unwrap();
    assert_eq!(reverse.modified[0].current.signal_quality, Some(-90));
}

#[test]
fn test_unknown_snapshot_maps_to_stable_code() {
    let (_dir, store) = setup();
    let err = diff_snapshots(&store, &"0".repeat(64), &"1".repeat(64)).unwrap_err();

    assert!(matches!(err, CellDeltaError::SnapshotNotFound { .. }));
    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::SnapshotNotFound);
    assert_eq!(ex.code(), "ERR_SNAPSHOT_NOT_FOUND");
}
