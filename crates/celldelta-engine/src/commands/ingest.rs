//! Ingest run orchestration.
//!
//! ## Pipeline (in order):
//! 1. Read raw rows from the source
//! 2. Normalize (row rejections are counted, never fatal)
//! 3. Apply the ingest scope (out-of-scope records are `filtered`)
//! 4. Deduplicate, last occurrence wins
//! 5. Build the snapshot (empty input halts with the run's counts)
//! 6. Diff against the store's latest snapshot
//! 7. Persist via `create_if_absent`
//! 8. Materialize the change set
//!
//! Nothing is written to the store before step 7, so a failing run leaves
//! the store untouched.

use std::collections::BTreeMap;
use std::time::Instant;

use celldelta_core::errors::{CellDeltaError, Result};
use celldelta_core::model::RawSource;
use celldelta_core::normalize::RejectReason;
use celldelta_core::report::RenderableChangeSet;
use celldelta_core::scope::IngestScope;
use celldelta_core::snapshot::Snapshot;
use celldelta_core::store::{CreateOutcome, SnapshotStore};
use celldelta_core::{build, dedupe, diff, log_op_end, log_op_error, log_op_start, normalize_all};
use celldelta_core::DiffResult;
use celldelta_core_types::correlation::{RunContext, RunId, TraceId};
use serde::Serialize;

const OP: &str = "ingest";

/// Row accounting for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub rows_read: usize,
    pub rows_rejected_by_reason: BTreeMap<RejectReason, usize>,
    /// Valid records dropped by the ingest scope
    pub rows_filtered: usize,
    pub duplicates_collapsed: usize,
    /// Records in the resulting snapshot
    pub record_count: usize,
}

impl RunReport {
    pub fn rows_rejected(&self) -> usize {
        self.rows_rejected_by_reason.values().sum()
    }
}

/// Everything a completed ingest run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: RunId,
    pub snapshot: Snapshot,
    pub persisted: CreateOutcome,
    /// Latest snapshot before this run, if any
    pub previous_id: Option<String>,
    pub diff: DiffResult,
    pub change_set: RenderableChangeSet,
    pub report: RunReport,
}

/// Run one ingest: build a snapshot from `source`, compare it with the
/// store's latest and persist it.
///
/// # Errors
///
/// - `SourceUnreadable` if the source cannot be read
/// - `EmptySnapshot` if no record survives normalization, scope and dedupe
/// - `StoreUnavailable` / `IntegrityViolation` from the store
pub fn run_ingest(
    source: &dyn RawSource,
    store: &mut dyn SnapshotStore,
    scope: &IngestScope,
    ctx: &RunContext,
) -> Result<RunOutcome> {
    let start = Instant::now();
    let provenance = source.provenance();
    let trace_id = ctx.trace_id.as_ref().map(TraceId::as_str);
    log_op_start!(OP, run_id = %ctx.run_id, trace_id, provenance = %provenance);

    match ingest_inner(source, provenance, store, scope, ctx) {
        Ok(outcome) => {
            log_op_end!(
                OP,
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %ctx.run_id,
                snapshot_id = %outcome.snapshot.snapshot_id(),
                record_count = outcome.report.record_count,
                rows_rejected = outcome.report.rows_rejected(),
                persisted = ?outcome.persisted
            );
            Ok(outcome)
        }
        Err(err) => {
            log_op_error!(
                OP,
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                run_id = %ctx.run_id,
                trace_id
            );
            Err(err)
        }
    }
}

fn ingest_inner(
    source: &dyn RawSource,
    provenance: String,
    store: &mut dyn SnapshotStore,
    scope: &IngestScope,
    ctx: &RunContext,
) -> Result<RunOutcome> {
    let rows = source.read_rows()?;
    let (records, normalized) = normalize_all(&rows);
    let (records, rows_filtered) = scope.apply(records);
    let (records, deduped) = dedupe(records);

    let mut report = RunReport {
        rows_read: normalized.rows_read,
        rows_rejected_by_reason: normalized.rejected.clone(),
        rows_filtered,
        duplicates_collapsed: deduped.duplicates_collapsed,
        record_count: records.len(),
    };

    if records.is_empty() {
        return Err(CellDeltaError::EmptySnapshot {
            rows_read: report.rows_read,
            rows_rejected: report.rows_rejected(),
            rows_filtered: report.rows_filtered,
        });
    }

    let snapshot = build(records, provenance)?;
    report.record_count = snapshot.record_count();

    let previous = store.get_latest()?;
    let diff = diff(previous.as_ref(), &snapshot);
    let persisted = store.create_if_absent(&snapshot)?;
    let change_set = celldelta_core::report::report(&diff);

    tracing::debug!(
        run_id = %ctx.run_id,
        added = diff.added.len(),
        removed = diff.removed.len(),
        modified = diff.modified.len(),
        "run diff materialized"
    );

    Ok(RunOutcome {
        run_id: ctx.run_id.clone(),
        previous_id: previous.map(|p| p.snapshot_id().to_string()),
        snapshot,
        persisted,
        diff,
        change_set,
        report,
    })
}
