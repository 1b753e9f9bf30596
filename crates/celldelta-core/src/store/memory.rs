use std::collections::HashMap;

use crate::errors::Result;
use crate::snapshot::Snapshot;

use super::{CreateOutcome, LedgerEntry, SnapshotStore};

/// In-memory snapshot store
///
/// HashMap-backed, single-threaded. Same sequencing rules as the durable
/// store, without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    snapshots: HashMap<String, Snapshot>,
    sequence: Vec<String>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct snapshots held
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get_latest(&self) -> Result<Option<Snapshot>> {
        Ok(self
            .sequence
            .last()
            .and_then(|id| self.snapshots.get(id))
            .cloned())
    }

    fn get(&self, snapshot_id: &str) -> Result<Option<Snapshot>> {
        Ok(self.snapshots.get(snapshot_id).cloned())
    }

    fn create_if_absent(&mut self, snapshot: &Snapshot) -> Result<CreateOutcome> {
        let id = snapshot.snapshot_id().to_string();
        let outcome = if self.snapshots.contains_key(&id) {
            CreateOutcome::AlreadyExists
        } else {
            self.snapshots.insert(id.clone(), snapshot.clone());
            CreateOutcome::Created
        };

        if self.sequence.last() != Some(&id) {
            self.sequence.push(id);
        }
        Ok(outcome)
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self
            .sequence
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                self.snapshots.get(id).map(|s| LedgerEntry {
                    seq: i as u64 + 1,
                    meta: s.meta(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;
    use crate::snapshot::build;

    fn snap(lat_e7: i32) -> Snapshot {
        build(vec![Record::at(lat_e7, 0)], "mem").unwrap()
    }

    #[test]
    fn test_empty_store_has_no_latest() {
        let store = MemorySnapshotStore::new();
        assert!(store.get_latest().unwrap().is_none());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_then_already_exists() {
        let mut store = MemorySnapshotStore::new();
        let a = snap(1_000);
        assert_eq!(store.create_if_absent(&a).unwrap(), CreateOutcome::Created);
        assert_eq!(
            store.create_if_absent(&a).unwrap(),
            CreateOutcome::AlreadyExists
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_returning_to_older_snapshot_makes_it_latest() {
        let mut store = MemorySnapshotStore::new();
        let a = snap(1_000);
        let b = snap(2_000);
        store.create_if_absent(&a).unwrap();
        store.create_if_absent(&b).unwrap();
        assert_eq!(
            store.create_if_absent(&a).unwrap(),
            CreateOutcome::AlreadyExists
        );

        let latest = store.get_latest().unwrap().unwrap();
        assert_eq!(latest.snapshot_id(), a.snapshot_id());
        assert_eq!(store.len(), 2);

        let seqs: Vec<u64> = store.list().unwrap().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_by_id() {
        let mut store = MemorySnapshotStore::new();
        let a = snap(1_000);
        store.create_if_absent(&a).unwrap();
        assert!(store.get(a.snapshot_id()).unwrap().is_some());
        assert!(store.get("missing").unwrap().is_none());
    }
}
