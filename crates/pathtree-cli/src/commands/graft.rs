//! `pathtree graft`: build a record and place it into a JSON tree document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use pathtree_model::{KeyMismatchPolicy, ModelRegistry, graft};
use pathtree_schema::TreePath;
use serde_json::{Value, json};

use crate::input::{load_schema, read_json_arg, read_tree};
use crate::opts::GlobalOpts;
use crate::output::print_success;

#[derive(Args, Debug)]
pub struct GraftArgs {
    /// Schema fragment(s); repeat to merge several
    #[arg(long = "schema", required = true)]
    pub schemas: Vec<PathBuf>,

    /// Tree document to graft into; starts empty when omitted or missing
    #[arg(long)]
    pub tree: Option<PathBuf>,

    /// Dot-separated path of the model
    pub path: String,

    /// Payload as inline JSON or @file
    #[arg(long, default_value = "{}")]
    pub data: String,

    /// Slot name in the parent container (defaults to the path's last token)
    #[arg(long)]
    pub name: Option<String>,

    /// Write the updated tree back to --tree instead of printing it
    #[arg(long, requires = "tree")]
    pub write: bool,
}

pub fn cmd_graft(opts: &GlobalOpts, args: &GraftArgs) -> Result<()> {
    let config = opts.engine_config()?;
    let schema = load_schema(&args.schemas)?;
    let registry = ModelRegistry::json_records(&schema);
    let data = read_json_arg(&args.data)?;
    let mut tree = match &args.tree {
        Some(path) => read_tree(path)?,
        None => Value::Object(Default::default()),
    };
    let name = match &args.name {
        Some(name) => name.clone(),
        None => TreePath::new(&args.path)?.last_token().to_string(),
    };

    let report = graft(
        &mut tree, &data, &name, &args.path, &schema, &registry, &config,
    )?;
    let warnings = match config.key_mismatch {
        KeyMismatchPolicy::Warn => report.mismatches.iter().map(|m| m.to_string()).collect(),
        _ => vec![],
    };

    if args.write {
        if let Some(path) = &args.tree {
            let text = serde_json::to_string_pretty(&tree)?;
            std::fs::write(path, text)
                .with_context(|| format!("write tree {}", path.display()))?;
        }
        print_success(opts, json!({ "placedAt": report.placed_at }), warnings)
    } else {
        print_success(
            opts,
            json!({ "placedAt": report.placed_at, "tree": tree }),
            warnings,
        )
    }
}
