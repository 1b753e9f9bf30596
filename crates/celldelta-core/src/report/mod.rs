//! Change reporter
//!
//! Flattens a [`crate::diff::DiffResult`] into geographic points for the
//! external heatmap renderer. Pure transformation, no I/O.

pub mod change_set;

pub use change_set::{
    report, ChangeClass, ChangePoint, ChangeSummary, RenderableChangeSet, CHANGE_SET_FORMAT,
};
