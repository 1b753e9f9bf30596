//! Digest computation for snapshots.
//!
//! A snapshot's id is the hex SHA-256 of its canonical bytes
//! (see [`super::canonical`]). Provenance and `created_at` are not part of
//! the canonical form, so semantically identical record sets always share
//! an id.
//!
//! ## Determinism Guarantees
//!
//! - Same records → same id
//! - Different record order → never reaches the digest (the builder rejects
//!   non-canonical input)

use crate::errors::Result;
use crate::model::Record;

use super::canonical;
use sha2::{Digest, Sha256};

/// Compute the snapshot id of an ordered record sequence.
///
/// ## Returns
///
/// Hex-encoded SHA256 digest (64 characters)
///
/// ## Errors
///
/// Returns `CellDeltaError::Serialization` if canonical encoding fails.
///
/// ## Example
///
/// ```
/// use celldelta_core::model::Record;
/// use celldelta_core::snapshot::digest::compute_snapshot_id;
///
/// let id = compute_snapshot_id(&[Record::at(100_000_000, 200_000_000)]).unwrap();
/// assert_eq!(id.len(), 64);
/// ```
pub fn compute_snapshot_id(records: &[Record]) -> Result<String> {
    let bytes = canonical::encode(records)?;
    Ok(hash_bytes(&bytes))
}

/// Hash bytes using SHA256, hex encoded.
pub fn hash_bytes(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hex::encode(hasher.finalize())
}
