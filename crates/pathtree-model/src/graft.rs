//! Writing built models into a tree at the position their path implies.
//!
//! Before building, the payload's key fields are cross-checked against the keys
//! encoded in the path. Disagreements are collected as [`KeyMismatch`]es and
//! handled according to [`KeyMismatchPolicy`]; under the default policy they are
//! logged and the write goes ahead with the path-derived identity.

use std::fmt;

use pathtree_schema::{PathData, Schema, TreePath, walk_path};
use serde::Serialize;
use serde_json::Value;

use crate::{
    EngineConfig, GraftTarget, KeyMismatchPolicy, ModelError, ModelRegistry,
    builder::build_from_steps,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    Primary,
    Parent,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Primary => f.write_str("primary"),
            KeyRole::Parent => f.write_str("parent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMismatch {
    pub path: String,
    pub role: KeyRole,
    pub field: String,
    /// Key value taken from the path.
    pub expected: Option<String>,
    /// Value found in the payload.
    pub found: Option<Value>,
}

impl fmt::Display for KeyMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} key '{}' in data, {}, does not match value from path, {}: {}",
            self.role,
            self.field,
            display_value(self.found.as_ref()),
            self.expected.as_deref().unwrap_or("undefined"),
            self.path
        )
    }
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "undefined".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraftReport {
    /// Where the model now lives in the tree.
    pub placed_at: TreePath,
    pub mismatches: Vec<KeyMismatch>,
}

impl GraftReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare the payload's key fields with the keys resolved from the path.
///
/// The primary check applies when the addressed step declares a primary key.
/// The parent check applies when it declares a parent key, and compares that
/// payload field with the key of the step before it.
pub fn check_keys(path: &TreePath, steps: &[PathData], data: &Value) -> Vec<KeyMismatch> {
    let mut mismatches = Vec::new();
    let Some((current, earlier)) = steps.split_last() else {
        return mismatches;
    };

    if let Some(field) = &current.values.primary_key {
        compare(
            &mut mismatches,
            path,
            KeyRole::Primary,
            field,
            current.values.key_value.as_deref(),
            data,
        );
    }
    if let Some(field) = &current.values.parent_key {
        let expected = earlier.last().and_then(|parent| parent.values.key_value.as_deref());
        compare(&mut mismatches, path, KeyRole::Parent, field, expected, data);
    }
    mismatches
}

fn compare(
    out: &mut Vec<KeyMismatch>,
    path: &TreePath,
    role: KeyRole,
    field: &str,
    expected: Option<&str>,
    data: &Value,
) {
    let found = data.get(field);
    let agrees = match (found, expected) {
        (Some(Value::String(found)), Some(expected)) => found == expected,
        (None, None) => true,
        _ => false,
    };
    if !agrees {
        out.push(KeyMismatch {
            path: path.to_string(),
            role,
            field: field.to_string(),
            expected: expected.map(str::to_string),
            found: found.cloned(),
        });
    }
}

/// Build the model at `path` from `data` and store it under `name` in the
/// container that `path`'s parent names (or at the tree root).
///
/// The tree is only touched once every check and the build have succeeded.
pub fn graft<M: 'static, T>(
    tree: &mut T,
    data: &Value,
    name: &str,
    path: &str,
    schema: &Schema,
    registry: &ModelRegistry<M>,
    config: &EngineConfig,
) -> Result<GraftReport, ModelError>
where
    T: GraftTarget<M> + ?Sized,
{
    let path = TreePath::new(path)?;
    let container = path.parent();
    let placed_at = match &container {
        Some(container) => container.join(name)?,
        None => TreePath::token(name)?,
    };

    let steps = walk_path(schema, &path)?;
    let mismatches = check_keys(&path, &steps, data);
    if !mismatches.is_empty() {
        match config.key_mismatch {
            KeyMismatchPolicy::Deny => {
                return Err(ModelError::KeyMismatch {
                    path: path.to_string(),
                    mismatches,
                });
            }
            KeyMismatchPolicy::Warn => {
                for mismatch in &mismatches {
                    log::warn!("{mismatch}");
                }
            }
            KeyMismatchPolicy::Ignore => {}
        }
    }

    let model = build_from_steps(registry, &path, &steps, data)?;
    tree.place(container.as_ref(), name, model, config.create_missing_containers)?;
    log::debug!("grafted {path} at {placed_at}");
    Ok(GraftReport {
        placed_at,
        mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathtree_schema::TreeDefinition;
    use serde_json::json;

    fn schema() -> Schema {
        let definition: TreeDefinition = serde_json::from_value(json!({
            "root": { "singleton": true, "children": {
                "plan": { "primaryKey": "id", "children": {
                    "commitment": { "primaryKey": "id", "parentKey": "planId" }
                } }
            } }
        }))
        .unwrap();
        Schema::compile(&definition).unwrap()
    }

    fn check(path: &str, data: Value) -> Vec<KeyMismatch> {
        let path = TreePath::new(path).unwrap();
        let steps = walk_path(&schema(), &path).unwrap();
        check_keys(&path, &steps, &data)
    }

    #[test]
    fn matching_keys_are_clean() {
        assert!(check("root.plan.p1", json!({ "id": "p1" })).is_empty());
        assert!(check("root.plan.p1.commitment.c1", json!({ "id": "c1", "planId": "p1" })).is_empty());
        assert!(check("root", json!({})).is_empty());
    }

    #[test]
    fn primary_mismatch_reported() {
        let mismatches = check("root.plan.p1", json!({ "id": "p2" }));
        assert_eq!(
            mismatches,
            vec![KeyMismatch {
                path: "root.plan.p1".into(),
                role: KeyRole::Primary,
                field: "id".into(),
                expected: Some("p1".into()),
                found: Some(json!("p2")),
            }]
        );
        assert_eq!(
            mismatches[0].to_string(),
            "primary key 'id' in data, p2, does not match value from path, p1: root.plan.p1"
        );
    }

    #[test]
    fn parent_mismatch_reported() {
        let mismatches = check("root.plan.p1.commitment.c1", json!({ "id": "c1", "planId": "p9" }));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].role, KeyRole::Parent);
        assert_eq!(mismatches[0].expected.as_deref(), Some("p1"));
    }

    #[test]
    fn missing_and_non_string_keys_mismatch() {
        let mismatches = check("root.plan.1", json!({ "id": 1 }));
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].found, Some(json!(1)));
        let mismatches = check("root.plan.p1.commitment.c1", json!({}));
        assert_eq!(mismatches.len(), 2);
    }

    #[test]
    fn collection_path_without_key_field_is_clean() {
        assert!(check("root.plan", json!({})).is_empty());
        assert_eq!(check("root.plan", json!({ "id": "p1" })).len(), 1);
    }
}
