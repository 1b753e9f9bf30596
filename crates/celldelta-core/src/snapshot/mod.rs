//! Snapshot construction.
//!
//! A [`Snapshot`] is an immutable, key-ordered set of deduplicated records
//! identified by the SHA-256 of its canonical bytes.
//!
//! ## Responsibilities
//!
//! - Verify builder input is strictly ascending by identity key
//! - Compute the canonical form and snapshot id
//! - Restore snapshots from stored bytes, re-checking their id
//!
//! ## Non-Responsibilities
//!
//! - Persistence (handled by a [`crate::store::SnapshotStore`])
//! - Orchestration (handled by `celldelta-engine`)

pub mod canonical;
pub mod digest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CellDeltaError, Result};
use crate::model::Record;

pub use canonical::FORMAT_VERSION;
pub use digest::compute_snapshot_id;

/// Snapshot metadata without the records
///
/// This is what a store ledger keeps per snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub snapshot_id: String,
    pub created_at: DateTime<Utc>,
    pub source_descriptor: String,
    pub record_count: usize,
    pub format_version: String,
}

/// Snapshot - immutable record set plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    snapshot_id: String,
    created_at: DateTime<Utc>,
    source_descriptor: String,
    format_version: String,
    records: Vec<Record>,
}

impl Snapshot {
    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source_descriptor(&self) -> &str {
        &self.source_descriptor
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn format_version(&self) -> &str {
        &self.format_version
    }

    /// Records in ascending identity-key order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn meta(&self) -> SnapshotMeta {
        SnapshotMeta {
            snapshot_id: self.snapshot_id.clone(),
            created_at: self.created_at,
            source_descriptor: self.source_descriptor.clone(),
            record_count: self.records.len(),
            format_version: self.format_version.clone(),
        }
    }

    /// The canonical bytes this snapshot's id is computed over
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if encoding fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        canonical::encode(&self.records)
    }

    /// Rebuild a snapshot from stored metadata and canonical bytes
    ///
    /// # Errors
    ///
    /// - `IntegrityViolation` if the bytes do not hash to `meta.snapshot_id`
    /// - `Serialization` if the bytes are not a canonical document
    /// - `NotCanonical` if the stored records are out of order
    pub fn restore(meta: SnapshotMeta, bytes: &[u8]) -> Result<Self> {
        let computed = digest::hash_bytes(bytes);
        if computed != meta.snapshot_id {
            return Err(CellDeltaError::IntegrityViolation {
                snapshot_id: meta.snapshot_id,
                computed,
            });
        }

        let records = canonical::decode(bytes)?;
        verify_canonical_order(&records)?;

        Ok(Self {
            snapshot_id: meta.snapshot_id,
            created_at: meta.created_at,
            source_descriptor: meta.source_descriptor,
            format_version: meta.format_version,
            records,
        })
    }
}

/// Build a snapshot from deduplicated, key-ordered records
///
/// ## Errors
///
/// - `EmptySnapshot` when `records` is empty (counts are zero here; the
///   engine reports the run's real counts before calling)
/// - `NotCanonical` when records are not strictly ascending by key
/// - `Serialization` if canonical encoding fails
pub fn build(records: Vec<Record>, provenance: impl Into<String>) -> Result<Snapshot> {
    build_at(records, provenance, Utc::now())
}

/// [`build`] with an explicit creation time
///
/// # Errors
///
/// Same as [`build`].
pub fn build_at(
    records: Vec<Record>,
    provenance: impl Into<String>,
    created_at: DateTime<Utc>,
) -> Result<Snapshot> {
    if records.is_empty() {
        return Err(CellDeltaError::EmptySnapshot {
            rows_read: 0,
            rows_rejected: 0,
            rows_filtered: 0,
        });
    }
    verify_canonical_order(&records)?;

    let snapshot_id = compute_snapshot_id(&records)?;
    tracing::debug!(
        snapshot_id = %snapshot_id,
        record_count = records.len(),
        "snapshot built"
    );

    Ok(Snapshot {
        snapshot_id,
        created_at,
        source_descriptor: provenance.into(),
        format_version: FORMAT_VERSION.to_string(),
        records,
    })
}

fn verify_canonical_order(records: &[Record]) -> Result<()> {
    let mut prev = None;
    for (position, record) in records.iter().enumerate() {
        let key = record.identity_key();
        if let Some(prev) = prev {
            if prev >= key {
                return Err(CellDeltaError::NotCanonical {
                    position,
                    message: format!("key {} does not follow {}", key, prev),
                });
            }
        }
        prev = Some(key);
    }
    Ok(())
}
