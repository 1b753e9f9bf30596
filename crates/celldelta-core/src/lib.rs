//! celldelta core - snapshot and differential processing engine
//!
//! This crate turns raw OpenCellID-style tower rows into immutable,
//! content-addressed snapshots and compares snapshots pairwise:
//! - Typed tower records and identity keys
//! - Row normalization with an explicit rejection taxonomy
//! - Optional region/operator scoping
//! - Deterministic deduplication (last observation wins)
//! - Canonical serialization and SHA-256 snapshot identity
//! - O(n + m) merge diff and a renderable change set
//!
//! Persistence and raw input live behind the [`store::SnapshotStore`] and
//! [`model::RawSource`] seams; concrete implementations are in
//! `celldelta-store`.

pub mod dedupe;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod normalize;
pub mod report;
pub mod scope;
pub mod snapshot;
pub mod store;

// Re-export commonly used types
pub use dedupe::{dedupe, DedupeReport};
pub use diff::{diff, DiffResult};
pub use errors::{CellDeltaError, ExError, ExErrorKind, Result};
pub use model::{IdentityKey, MemorySource, RadioType, RawRow, RawSource, Record};
pub use normalize::{normalize, normalize_all, NormalizeReport, RejectReason};
pub use report::{report, RenderableChangeSet};
pub use scope::{BoundingBox, IngestScope};
pub use snapshot::{build, Snapshot, SnapshotMeta};
pub use store::{CreateOutcome, LedgerEntry, MemorySnapshotStore, SnapshotStore};
