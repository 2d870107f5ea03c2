//! Loading schemas, payloads and tree documents from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pathtree_schema::{Schema, TreeDefinition, merge_all};
use serde_json::Value;

pub fn read_definition(path: &Path) -> Result<TreeDefinition> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse schema {}", path.display()))
}

/// Merge every fragment in order and compile the result.
pub fn load_schema(fragments: &[PathBuf]) -> Result<Schema> {
    let definitions = fragments
        .iter()
        .map(|path| read_definition(path))
        .collect::<Result<Vec<_>>>()?;
    let merged = merge_all(&definitions);
    tracing::debug!(fragments = fragments.len(), kinds = merged.len(), "schema merged");
    Schema::compile(&merged).context("compile schema")
}

/// Inline JSON, or `@file` to read it from a file.
pub fn read_json_arg(arg: &str) -> Result<Value> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("read payload {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parse payload {path}"))
        }
        None => serde_json::from_str(arg).context("parse inline payload"),
    }
}

/// Existing tree document, or an empty object when the file does not exist yet.
pub fn read_tree(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(Default::default()));
    }
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read tree {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse tree {}", path.display()))
}
