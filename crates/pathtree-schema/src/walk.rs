//! Resolution of a path against a schema into one [`PathData`] per level crossed.
//!
//! A singleton level consumes its kind token; a keyed level consumes its kind
//! token and the key token after it. The parent key value of a keyed step is the
//! key value of the step resolved immediately before it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{EntryShape, KindName, PathError, Schema, TreePath};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("path not valid for tree definition: {path} (unknown kind '{kind}' at token {offset})")]
    UnknownKind {
        path: String,
        kind: String,
        offset: usize,
    },
    /// A keyed first step declaring a parent key. [`Schema::compile`] rejects such
    /// schemas, so this only guards against a schema assembled without it.
    #[error("kind '{kind}' declares a parent key but is the first step of {path}")]
    MissingParent { path: String, kind: String },
}

/// Values resolved for one path step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectValues {
    pub singleton: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key_value: Option<String>,
}

impl ObjectValues {
    pub fn singleton() -> Self {
        ObjectValues {
            singleton: true,
            ..Default::default()
        }
    }

    /// A keyed step without a key token: the path names the collection itself.
    pub fn is_collection(&self) -> bool {
        !self.singleton && self.key_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathData {
    pub kind: KindName,
    pub values: ObjectValues,
}

impl PathData {
    /// Number of path tokens this step was resolved from.
    pub fn tokens_consumed(&self) -> usize {
        if self.values.singleton || self.values.key_value.is_none() {
            1
        } else {
            2
        }
    }
}

pub fn walk(schema: &Schema, path: &str) -> Result<Vec<PathData>, WalkError> {
    walk_with(schema, path, |_, _| {})
}

/// Like [`walk`], calling `observer` with the schema and the steps resolved so
/// far after every step.
pub fn walk_with<F>(schema: &Schema, path: &str, observer: F) -> Result<Vec<PathData>, WalkError>
where
    F: FnMut(&Schema, &[PathData]),
{
    let path = TreePath::new(path)?;
    walk_path_with(schema, &path, observer)
}

pub fn walk_path(schema: &Schema, path: &TreePath) -> Result<Vec<PathData>, WalkError> {
    walk_path_with(schema, path, |_, _| {})
}

pub(crate) fn walk_path_with<F>(
    schema: &Schema,
    path: &TreePath,
    mut observer: F,
) -> Result<Vec<PathData>, WalkError>
where
    F: FnMut(&Schema, &[PathData]),
{
    let tokens: Vec<&str> = path.tokens().collect();
    let mut steps: Vec<PathData> = Vec::new();
    let mut level = Some(schema.root());
    let mut offset = 0;

    while offset < tokens.len() {
        let kind = tokens[offset];
        // After a leaf there is no level left, so any further token is unknown.
        let node = level
            .and_then(|level| level.get(kind))
            .ok_or_else(|| WalkError::UnknownKind {
                path: path.to_string(),
                kind: kind.to_string(),
                offset,
            })?;

        let values = match &node.shape {
            EntryShape::Singleton => {
                offset += 1;
                ObjectValues::singleton()
            }
            EntryShape::Keyed {
                primary_key,
                parent_key,
            } => {
                let parent_key_value = match parent_key {
                    Some(_) => {
                        let parent = steps.last().ok_or_else(|| WalkError::MissingParent {
                            path: path.to_string(),
                            kind: kind.to_string(),
                        })?;
                        parent.values.key_value.clone()
                    }
                    None => None,
                };
                let key_value = tokens.get(offset + 1).map(|token| token.to_string());
                offset += 2;
                ObjectValues {
                    singleton: false,
                    primary_key: primary_key.clone(),
                    key_value,
                    parent_key: parent_key.clone(),
                    parent_key_value,
                }
            }
        };

        log::trace!("{path}: resolved step {} as {kind}", steps.len());
        steps.push(PathData {
            kind: kind.to_string(),
            values,
        });
        observer(schema, &steps);
        level = node.children.as_ref();
    }

    Ok(steps)
}
