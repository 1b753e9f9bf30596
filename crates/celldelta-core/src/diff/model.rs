//! Snapshot diff output types.
//!
//! Buckets are plain `Vec`s in ascending identity-key order so serialized
//! output is deterministic.

use serde::Serialize;

use crate::model::{IdentityKey, Record};

/// The result of comparing a previous snapshot (if any) with a current one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    /// Id of the previous snapshot, absent on a first run
    pub previous_id: Option<String>,
    pub current_id: String,
    /// Keys only in current
    pub added: Vec<Record>,
    /// Keys only in previous
    pub removed: Vec<Record>,
    /// Keys in both with differing records
    pub modified: Vec<ModifiedRecord>,
    /// Keys in both with equal records (current side)
    pub unchanged: Vec<Record>,
}

/// A key present on both sides whose record changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifiedRecord {
    pub key: IdentityKey,
    pub previous: Record,
    pub current: Record,
}

/// High-level classification of a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffClassification {
    /// No previous snapshot; everything is new
    Initial,
    /// Both sides hold the same record set
    Identical,
    /// At least one tower was added, removed or modified
    Changed,
}

/// Bucket sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffResult {
    pub fn counts(&self) -> DiffCounts {
        DiffCounts {
            added: self.added.len(),
            removed: self.removed.len(),
            modified: self.modified.len(),
            unchanged: self.unchanged.len(),
        }
    }

    pub fn classification(&self) -> DiffClassification {
        if self.previous_id.is_none() {
            DiffClassification::Initial
        } else if self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty() {
            DiffClassification::Identical
        } else {
            DiffClassification::Changed
        }
    }

    /// Keys of the added bucket, in order
    pub fn added_keys(&self) -> Vec<IdentityKey> {
        self.added.iter().map(Record::identity_key).collect()
    }

    /// Keys of the removed bucket, in order
    pub fn removed_keys(&self) -> Vec<IdentityKey> {
        self.removed.iter().map(Record::identity_key).collect()
    }

    /// Keys of the modified bucket, in order
    pub fn modified_keys(&self) -> Vec<IdentityKey> {
        self.modified.iter().map(|m| m.key.clone()).collect()
    }

    /// Keys of the unchanged bucket, in order
    pub fn unchanged_keys(&self) -> Vec<IdentityKey> {
        self.unchanged.iter().map(Record::identity_key).collect()
    }
}

impl DiffCounts {
    pub fn total(&self) -> usize {
        self.added + self.removed + self.modified + self.unchanged
    }
}
