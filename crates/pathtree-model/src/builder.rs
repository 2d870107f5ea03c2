use pathtree_schema::{PathData, Schema, TreePath, walk_path};
use serde_json::Value;

use crate::{BuiltModel, ModelError, ModelRegistry, Pathed};

/// Build the model addressed by `path` from `data`.
///
/// Returns an instance when the last resolved step is a singleton or carries a
/// key; otherwise the path names a collection and a placeholder is returned
/// without consulting any factory.
pub fn build<M: 'static>(
    schema: &Schema,
    registry: &ModelRegistry<M>,
    path: &str,
    data: &Value,
) -> Result<BuiltModel<M>, ModelError> {
    let path = TreePath::new(path)?;
    let steps = walk_path(schema, &path)?;
    build_from_steps(registry, &path, &steps, data)
}

pub(crate) fn build_from_steps<M: 'static>(
    registry: &ModelRegistry<M>,
    path: &TreePath,
    steps: &[PathData],
    data: &Value,
) -> Result<BuiltModel<M>, ModelError> {
    let model_data = match steps.last() {
        Some(step) if step.values.singleton || step.values.key_value.is_some() => step,
        _ => return Ok(BuiltModel::Collection { path: path.clone() }),
    };

    let kind = model_data.kind.as_str();
    let model = registry
        .create(kind, data)
        .ok_or_else(|| ModelError::UnregisteredKind {
            kind: kind.to_string(),
            path: path.to_string(),
        })?
        .map_err(|source| ModelError::Factory {
            kind: kind.to_string(),
            path: path.to_string(),
            source,
        })?;
    log::debug!("built {kind} at {path}");
    Ok(BuiltModel::Instance(Pathed::new(model, path.clone())))
}
