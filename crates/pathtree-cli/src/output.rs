//! JSON output envelope: `{ data, warnings? }` on stdout.

use anyhow::Result;
use serde_json::{Value, json};

use crate::opts::GlobalOpts;

pub fn print_success(opts: &GlobalOpts, data: Value, warnings: Vec<String>) -> Result<()> {
    let mut root = json!({ "data": data });
    if !warnings.is_empty() {
        root["warnings"] = warnings.into_iter().map(Value::String).collect();
    }
    if opts.pretty {
        println!("{}", serde_json::to_string_pretty(&root)?);
    } else {
        println!("{}", serde_json::to_string(&root)?);
    }
    Ok(())
}
