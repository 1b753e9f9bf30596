//! Snapshot diff computation engine.
//!
//! The core entry point is [`diff`]. Both snapshots are already in
//! canonical key order, so a single merge walk over the two record slices
//! classifies every key in O(n + m) without building an index.

use std::cmp::Ordering;

use crate::diff::model::{DiffResult, ModifiedRecord};
use crate::snapshot::Snapshot;

/// Compare `previous` (absent on a first run) with `current`
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot) -> DiffResult {
    let current_id = current.snapshot_id().to_string();

    let Some(previous) = previous else {
        return DiffResult {
            previous_id: None,
            current_id,
            added: current.records().to_vec(),
            removed: Vec::new(),
            modified: Vec::new(),
            unchanged: Vec::new(),
        };
    };

    if previous.snapshot_id() == current.snapshot_id() {
        return DiffResult {
            previous_id: Some(previous.snapshot_id().to_string()),
            current_id,
            added: Vec::new(),
            removed: Vec::new(),
            modified: Vec::new(),
            unchanged: current.records().to_vec(),
        };
    }

    let mut result = DiffResult {
        previous_id: Some(previous.snapshot_id().to_string()),
        current_id,
        added: Vec::new(),
        removed: Vec::new(),
        modified: Vec::new(),
        unchanged: Vec::new(),
    };

    let prev = previous.records();
    let cur = current.records();
    let (mut i, mut j) = (0, 0);

    while i < prev.len() && j < cur.len() {
        let prev_key = prev[i].identity_key();
        let cur_key = cur[j].identity_key();
        match prev_key.cmp(&cur_key) {
            Ordering::Less => {
                result.removed.push(prev[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                result.added.push(cur[j].clone());
                j += 1;
            }
            Ordering::Equal => {
                if prev[i].same_content(&cur[j]) {
                    result.unchanged.push(cur[j].clone());
                } else {
                    result.modified.push(ModifiedRecord {
                        key: cur_key,
                        previous: prev[i].clone(),
                        current: cur[j].clone(),
                    });
                }
                i += 1;
                j += 1;
            }
        }
    }
    result.removed.extend_from_slice(&prev[i..]);
    result.added.extend_from_slice(&cur[j..]);

    tracing::debug!(
        added = result.added.len(),
        removed = result.removed.len(),
        modified = result.modified.len(),
        unchanged = result.unchanged.len(),
        "diff computed"
    );

    result
}
