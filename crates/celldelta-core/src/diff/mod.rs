//! Snapshot diff engine.
//!
//! Compares two snapshots key by key and sorts every tower into exactly one
//! of `added`, `removed`, `modified` or `unchanged`.
//!
//! ## Entry point
//!
//! ```ignore
//! use celldelta_core::diff::{diff, render_human_summary};
//!
//! let result = diff(previous.as_ref(), &current);
//! println!("{}", render_human_summary(&result));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: every bucket is in ascending identity-key order.
//! - **Symmetry**: `diff(A, B).added == diff(B, A).removed`, and modified
//!   pairs swap sides.
//! - **Partition**: each key of either snapshot lands in exactly one bucket.
//! - **Short-circuit**: equal snapshot ids yield all-unchanged without a walk.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::diff;
pub use human_summary::render_human_summary;
pub use model::{DiffClassification, DiffCounts, DiffResult, ModifiedRecord};
