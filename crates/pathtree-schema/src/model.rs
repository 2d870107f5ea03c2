use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type KindName = String;

/// One level of an authored schema: the kinds that are legal at a nesting depth.
///
/// This is the wire/authoring form. Every entry field is optional so that partial
/// fragments can be merged; [`crate::Schema::compile`] turns a finished definition
/// into the shape the walker consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeDefinition {
    pub entries: IndexMap<KindName, TreeEntry>,
}

impl TreeDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining helper for building definitions in code.
    pub fn with(mut self, kind: impl Into<KindName>, entry: TreeEntry) -> Self {
        self.entries.insert(kind.into(), entry);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&TreeEntry> {
        self.entries.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn insert(&mut self, kind: impl Into<KindName>, entry: TreeEntry) -> Option<TreeEntry> {
        self.entries.insert(kind.into(), entry)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, KindName, TreeEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `self` with `fragment` merged on top. See [`crate::merge`].
    pub fn merged(&self, fragment: &TreeDefinition) -> TreeDefinition {
        crate::merge(self, fragment)
    }
}

impl FromIterator<(KindName, TreeEntry)> for TreeDefinition {
    fn from_iter<I: IntoIterator<Item = (KindName, TreeEntry)>>(iter: I) -> Self {
        TreeDefinition {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TreeDefinition {
    type Item = (&'a KindName, &'a TreeEntry);
    type IntoIter = indexmap::map::Iter<'a, KindName, TreeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Shape of a single kind. Absent fields stay absent through serde so that
/// fragments keep "unspecified" distinct from "explicitly set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TreeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singleton: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    /// Opaque host metadata; carried through merges untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substitute_with: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<TreeDefinition>,
}

impl TreeEntry {
    pub fn singleton() -> Self {
        TreeEntry {
            singleton: Some(true),
            ..Default::default()
        }
    }

    pub fn keyed(primary_key: impl Into<String>) -> Self {
        TreeEntry {
            primary_key: Some(primary_key.into()),
            ..Default::default()
        }
    }

    pub fn with_parent_key(mut self, parent_key: impl Into<String>) -> Self {
        self.parent_key = Some(parent_key.into());
        self
    }

    pub fn with_children(mut self, children: TreeDefinition) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_substitute(mut self, substitute: Value) -> Self {
        self.substitute_with = Some(substitute);
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton == Some(true)
    }
}
