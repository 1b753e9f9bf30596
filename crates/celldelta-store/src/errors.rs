//! Error handling for celldelta-store
//!
//! Maps backend failures (SQLite, filesystem, CAS) onto the core
//! [`CellDeltaError`] taxonomy so store results flow straight through the
//! `SnapshotStore` seam.

use celldelta_core::errors::CellDeltaError;
use celldelta_core::snapshot::digest::hash_bytes;

/// Result type alias using CellDeltaError
pub type Result<T> = celldelta_core::errors::Result<T>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> CellDeltaError {
    CellDeltaError::StoreUnavailable {
        op: "migration".to_string(),
        message: format!("Migration {} failed: {}", migration_id, reason),
    }
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> CellDeltaError {
    CellDeltaError::StoreUnavailable {
        op: "migration_checksum".to_string(),
        message: format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ),
    }
}

/// Create a CAS collision error
///
/// The blob on disk does not hash to the digest it is filed under.
pub fn cas_collision(digest: &str, existing: &[u8]) -> CellDeltaError {
    CellDeltaError::IntegrityViolation {
        snapshot_id: digest.to_string(),
        computed: hash_bytes(existing),
    }
}

/// Create a CAS missing blob error
pub fn cas_missing(digest: &str) -> CellDeltaError {
    CellDeltaError::StoreUnavailable {
        op: "cas_read".to_string(),
        message: format!("CAS blob not found for digest {}", digest),
    }
}

/// Create a store error from rusqlite::Error
pub fn from_rusqlite(operation: &str, err: rusqlite::Error) -> CellDeltaError {
    CellDeltaError::StoreUnavailable {
        op: operation.to_string(),
        message: err.to_string(),
    }
}

/// Create a store error from an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> CellDeltaError {
    CellDeltaError::StoreUnavailable {
        op: operation.to_string(),
        message: err.to_string(),
    }
}

/// Create a raw-input error for an unreadable source
pub fn source_unreadable(source_descriptor: &str, message: impl Into<String>) -> CellDeltaError {
    CellDeltaError::SourceUnreadable {
        source_descriptor: source_descriptor.to_string(),
        message: message.into(),
    }
}
