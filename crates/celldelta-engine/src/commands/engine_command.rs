//! Engine-level commands for operations that touch the store.

use celldelta_core::errors::Result;
use celldelta_core::model::RawSource;
use celldelta_core::scope::IngestScope;
use celldelta_core::store::{LedgerEntry, SnapshotStore};
use celldelta_core::DiffResult;
use celldelta_core_types::correlation::RunContext;

use crate::commands::diff::diff_snapshots;
use crate::commands::ingest::{run_ingest, RunOutcome};

/// Engine-level commands that require a snapshot store.
pub enum EngineCommand<'a> {
    /// Ingest a raw source and compare it with the latest snapshot.
    Ingest {
        source: &'a dyn RawSource,
        scope: IngestScope,
    },
    /// Compare two stored snapshots.
    Diff {
        previous_id: String,
        current_id: String,
    },
    /// Read the run ledger.
    ListSnapshots,
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Ingest(Box<RunOutcome>),
    Diff(DiffResult),
    ListSnapshots(Vec<LedgerEntry>),
}

/// Apply an engine command against `store`.
///
/// # Errors
///
/// Whatever the underlying operation returns.
pub fn apply_engine_command(
    cmd: EngineCommand<'_>,
    store: &mut dyn SnapshotStore,
    ctx: &RunContext,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Ingest { source, scope } => {
            let outcome = run_ingest(source, store, &scope, ctx)?;
            Ok(EngineCommandResult::Ingest(Box::new(outcome)))
        }
        EngineCommand::Diff {
            previous_id,
            current_id,
        } => Ok(EngineCommandResult::Diff(diff_snapshots(
            store,
            &previous_id,
            &current_id,
        )?)),
        EngineCommand::ListSnapshots => Ok(EngineCommandResult::ListSnapshots(store.list()?)),
    }
}
