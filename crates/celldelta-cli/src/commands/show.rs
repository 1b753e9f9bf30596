//! Show command

use celldelta_core::errors::CellDeltaError;
use celldelta_core::model::record::format_coord;
use celldelta_core::store::SnapshotStore;
use clap::Args;

use crate::commands::print_json;
use crate::Env;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Snapshot id
    pub snapshot_id: String,

    /// Also list every record
    #[arg(long)]
    pub records: bool,

    /// Print metadata (and records with --records) as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ShowArgs, env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let store = env.store.open()?;
    let snapshot = store
        .get(&args.snapshot_id)?
        .ok_or_else(|| CellDeltaError::SnapshotNotFound {
            snapshot_id: args.snapshot_id.clone(),
        })?;

    if args.json {
        let mut value = serde_json::to_value(snapshot.meta())?;
        if args.records {
            value["records"] = serde_json::to_value(snapshot.records())?;
        }
        return print_json(&value);
    }

    let meta = snapshot.meta();
    println!("snapshot   {}", meta.snapshot_id);
    println!("created    {}", meta.created_at.to_rfc3339());
    println!("source     {}", meta.source_descriptor);
    println!("records    {}", meta.record_count);
    println!("format     {}", meta.format_version);

    if args.records {
        println!();
        for r in snapshot.records() {
            println!(
                "{}  {} {}  {}",
                r.identity_key(),
                format_coord(r.lat_e7),
                format_coord(r.lon_e7),
                r.radio
            );
        }
    }
    Ok(())
}
