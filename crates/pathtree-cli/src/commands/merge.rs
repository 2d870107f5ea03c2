//! `pathtree merge`: combine schema fragments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pathtree_schema::{Schema, merge_all};

use crate::input::read_definition;
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Schema fragments, merged left to right
    #[arg(required = true)]
    pub fragments: Vec<PathBuf>,

    /// Also compile the merged definition and fail if it is inconsistent
    #[arg(long)]
    pub check: bool,
}

pub fn cmd_merge(opts: &GlobalOpts, args: &MergeArgs) -> Result<()> {
    let definitions = args
        .fragments
        .iter()
        .map(|path| read_definition(path))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge_all(&definitions);
    if args.check {
        let schema = Schema::compile(&merged).context("compile merged schema")?;
        tracing::info!(kinds = schema.kinds().len(), "merged schema compiles");
    }
    print_success(opts, serde_json::to_value(&merged)?, vec![])
}
