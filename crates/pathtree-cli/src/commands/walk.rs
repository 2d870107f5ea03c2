//! `pathtree walk`: resolve a path into per-kind steps.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pathtree_schema::walk_with;

use crate::input::load_schema;
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Schema fragment(s); repeat to merge several
    #[arg(long = "schema", required = true)]
    pub schemas: Vec<PathBuf>,

    /// Dot-separated path, e.g. root.plan.p1
    pub path: String,

    /// Print every intermediate step to stderr
    #[arg(long)]
    pub trace: bool,
}

pub fn cmd_walk(opts: &GlobalOpts, args: &WalkArgs) -> Result<()> {
    let schema = load_schema(&args.schemas)?;
    let trace = args.trace;
    let steps = walk_with(&schema, &args.path, |_, steps| {
        if let Some(step) = steps.last().filter(|_| trace) {
            eprintln!("step {}: {}", steps.len(), step.kind);
        }
    })?;
    print_success(opts, serde_json::to_value(&steps)?, vec![])
}
