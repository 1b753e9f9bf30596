//! List command

use celldelta_core::store::SnapshotStore;
use clap::Args;

use crate::commands::print_json;
use crate::Env;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print the ledger as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ListArgs, env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let store = env.store.open()?;
    let ledger = store.list()?;

    if args.json {
        return print_json(&ledger);
    }
    if ledger.is_empty() {
        println!("no snapshots recorded");
        return Ok(());
    }
    for entry in &ledger {
        println!(
            "{:>4}  {}  {}  {:>8}  {}",
            entry.seq,
            entry.meta.snapshot_id,
            entry.meta.created_at.to_rfc3339(),
            entry.meta.record_count,
            entry.meta.source_descriptor
        );
    }
    Ok(())
}
