//! `pathtree build`: construct the record a path addresses.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pathtree_model::{ModelRegistry, build};

use crate::input::{load_schema, read_json_arg};
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Schema fragment(s); repeat to merge several
    #[arg(long = "schema", required = true)]
    pub schemas: Vec<PathBuf>,

    /// Dot-separated path of the model
    pub path: String,

    /// Payload as inline JSON or @file
    #[arg(long, default_value = "{}")]
    pub data: String,
}

pub fn cmd_build(opts: &GlobalOpts, args: &BuildArgs) -> Result<()> {
    let schema = load_schema(&args.schemas)?;
    let registry = ModelRegistry::json_records(&schema);
    let data = read_json_arg(&args.data)?;
    let model = build(&schema, &registry, &args.path, &data)?;
    print_success(opts, serde_json::to_value(&model)?, vec![])
}
