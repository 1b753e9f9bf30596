//! Ingest command

use std::path::PathBuf;

use celldelta_core::diff::render_human_summary;
use celldelta_core::errors::ExError;
use celldelta_core_types::correlation::{RunContext, TraceId};
use celldelta_engine::{run_ingest, RunOutcome};
use celldelta_store::CsvFileSource;
use clap::Args;
use serde_json::json;

use crate::commands::{print_json, write_json};
use crate::config::{resolve_scope, ScopeOverrides};
use crate::Env;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// OpenCellID CSV export
    #[arg(long)]
    pub input: PathBuf,

    /// Region preset (muenchen, berlin, hamburg)
    #[arg(long)]
    pub region: Option<String>,

    /// Operator preset (telekom, vodafone, telefonica)
    #[arg(long)]
    pub operator: Option<String>,

    #[arg(long)]
    pub mcc: Option<u16>,

    /// Allowed network code; repeat for several
    #[arg(long = "mnc")]
    pub mncs: Vec<u16>,

    /// Write the change set JSON here
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the run as JSON instead of a text summary
    #[arg(long)]
    pub json: bool,

    /// Trace id of the scheduler job driving this run
    #[arg(long)]
    pub trace_id: Option<String>,
}

pub fn execute(args: IngestArgs, env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let scope = resolve_scope(
        &env.config.scope,
        ScopeOverrides {
            region: args.region,
            operator: args.operator,
            mcc: args.mcc,
            mncs: args.mncs,
        },
    )?;
    let source = CsvFileSource::open(&args.input)?;
    let mut store = env.store.open()?;

    let mut ctx = RunContext::new();
    if let Some(trace_id) = args.trace_id {
        ctx = ctx.with_trace_id(TraceId::from_string(trace_id));
    }
    let outcome = run_ingest(&source, &mut store, &scope, &ctx)
        .map_err(|err| ExError::from(err).in_run(&ctx))?;

    if let Some(out) = &args.out {
        write_json(out, &outcome.change_set)?;
    }

    if args.json {
        print_json(&json!({
            "run_id": outcome.run_id,
            "snapshot_id": outcome.snapshot.snapshot_id(),
            "previous_id": outcome.previous_id,
            "persisted": outcome.persisted,
            "report": outcome.report,
            "change_set": outcome.change_set,
        }))?;
    } else {
        print_text(&outcome);
    }
    Ok(())
}

fn print_text(outcome: &RunOutcome) {
    let report = &outcome.report;
    println!("run {}", outcome.run_id);
    println!(
        "snapshot {} ({:?}, {} records)",
        outcome.snapshot.snapshot_id(),
        outcome.persisted,
        report.record_count
    );
    println!(
        "rows read {}, rejected {}, filtered {}, duplicates collapsed {}",
        report.rows_read,
        report.rows_rejected(),
        report.rows_filtered,
        report.duplicates_collapsed
    );
    for (reason, count) in &report.rows_rejected_by_reason {
        println!("  {}: {}", reason, count);
    }
    println!();
    print!("{}", render_human_summary(&outcome.diff));
}
