//! Diff command

use std::path::PathBuf;

use celldelta_core::diff::render_human_summary;
use celldelta_core::report::report;
use celldelta_engine::diff_snapshots;
use clap::Args;

use crate::commands::{print_json, write_json};
use crate::Env;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Previous snapshot id
    #[arg(long)]
    pub from: String,

    /// Current snapshot id
    #[arg(long)]
    pub to: String,

    /// Write the change set JSON here
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print the change set JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: DiffArgs, env: &Env) -> Result<(), Box<dyn std::error::Error>> {
    let store = env.store.open()?;
    let result = diff_snapshots(&store, &args.from, &args.to)?;
    let change_set = report(&result);

    if let Some(out) = &args.out {
        write_json(out, &change_set)?;
    }
    if args.json {
        print_json(&change_set)?;
    } else {
        print!("{}", render_human_summary(&result));
    }
    Ok(())
}
