//! Filesystem-based Content-Addressable Storage
//!
//! Snapshot bodies are stored as `<root>/<2 hex>/<sha256>.json`. Since a
//! snapshot id is the SHA-256 of its canonical bytes, the CAS digest and
//! the snapshot id coincide.

use crate::cas::atomic::atomic_write;
use crate::cas::sharding::{is_digest, shard_path};
use crate::errors::{cas_collision, cas_missing, io_error, Result};
use celldelta_core::snapshot::digest::hash_bytes;
use std::fs;
use std::path::{Path, PathBuf};

const BLOB_EXTENSION: &str = "json";

/// Filesystem-based CAS store
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a new CAS store at the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write content to CAS and return its digest
    ///
    /// - Writes atomically using temp→rename
    /// - Idempotent: writing same content twice succeeds
    /// - A blob already filed under the digest with different bytes is an
    ///   integrity violation
    pub fn write(&self, content: &[u8]) -> Result<String> {
        let digest = hash_bytes(content);
        let target_path = shard_path(&self.root, &digest, BLOB_EXTENSION);

        if target_path.exists() {
            let existing = fs::read(&target_path).map_err(|e| io_error("cas_read", e))?;
            if existing == content {
                return Ok(digest);
            }
            return Err(cas_collision(&digest, &existing));
        }

        atomic_write(&target_path, content)?;
        tracing::debug!(digest = %digest, size_bytes = content.len(), "blob written to CAS");

        Ok(digest)
    }

    /// Read content from CAS by digest
    pub fn read(&self, digest: &str) -> Result<Vec<u8>> {
        if !is_digest(digest) {
            return Err(cas_missing(digest));
        }
        let path = shard_path(&self.root, digest, BLOB_EXTENSION);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(cas_missing(digest)),
            Err(e) => Err(io_error("cas_read", e)),
        }
    }

    pub fn contains(&self, digest: &str) -> bool {
        is_digest(digest) && shard_path(&self.root, digest, BLOB_EXTENSION).exists()
    }
}
