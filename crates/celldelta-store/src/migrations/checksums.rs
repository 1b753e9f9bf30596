//! Migration checksums
//!
//! A migration's checksum is the same hex SHA-256 used for snapshot ids,
//! taken over the embedded SQL text.

use celldelta_core::snapshot::digest::hash_bytes;

/// Checksum of a migration's SQL
pub fn compute_checksum(sql: &str) -> String {
    hash_bytes(sql.as_bytes())
}
