//! Sharding logic for CAS
//!
//! Blobs live under a subdirectory named after the first two hex characters
//! of their digest.

use std::path::{Path, PathBuf};

/// For digest "abc123...", returns "<root>/ab/abc123....<ext>"
pub fn shard_path(root: &Path, digest: &str, extension: &str) -> PathBuf {
    let shard = digest.get(..2).unwrap_or(digest);
    root.join(shard).join(format!("{}.{}", digest, extension))
}

/// Whether a string looks like a full hex SHA-256 digest
pub fn is_digest(value: &str) -> bool {
    value.len() == 64 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_path() {
        let path = shard_path(Path::new("/cas"), "abc123def456", "json");
        assert_eq!(path, PathBuf::from("/cas/ab/abc123def456.json"));
    }

    #[test]
    fn test_short_digest_does_not_panic() {
        let path = shard_path(Path::new("/cas"), "a", "json");
        assert_eq!(path, PathBuf::from("/cas/a/a.json"));
    }

    #[test]
    fn test_is_digest() {
        assert!(is_digest(&"a".repeat(64)));
        assert!(!is_digest("../../etc/passwd"));
        assert!(!is_digest(&"g".repeat(64)));
    }
}
