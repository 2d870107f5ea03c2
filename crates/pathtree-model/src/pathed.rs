use std::ops::Deref;

use pathtree_schema::TreePath;
use serde::{Deserialize, Serialize};

/// A model value tagged with the path it lives at.
///
/// Serializes as the value's own fields with `path` alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pathed<T> {
    pub path: TreePath,
    #[serde(flatten)]
    pub value: T,
}

impl<T> Pathed<T> {
    pub fn new(value: T, path: TreePath) -> Self {
        Pathed { path, value }
    }

    pub fn path(&self) -> &TreePath {
        &self.path
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Clone> Pathed<T> {
    /// Deep-copies `value` and tags the copy; `value` itself is untouched.
    pub fn tag(value: &T, path: &TreePath) -> Self {
        Pathed::new(value.clone(), path.clone())
    }

    /// A copy of this value carrying `path` in place of the previous tag.
    pub fn retag(&self, path: &TreePath) -> Self {
        Pathed::tag(&self.value, path)
    }
}

impl<T> Deref for Pathed<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Result of building at a path: a concrete instance, or a placeholder when the
/// path names a collection rather than a member of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BuiltModel<M> {
    Instance(Pathed<M>),
    Collection { path: TreePath },
}

impl<M> BuiltModel<M> {
    pub fn path(&self) -> &TreePath {
        match self {
            BuiltModel::Instance(pathed) => &pathed.path,
            BuiltModel::Collection { path } => path,
        }
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, BuiltModel::Instance(_))
    }

    pub fn as_instance(&self) -> Option<&Pathed<M>> {
        match self {
            BuiltModel::Instance(pathed) => Some(pathed),
            BuiltModel::Collection { .. } => None,
        }
    }

    pub fn into_instance(self) -> Option<Pathed<M>> {
        match self {
            BuiltModel::Instance(pathed) => Some(pathed),
            BuiltModel::Collection { .. } => None,
        }
    }
}
