use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use thiserror::Error;

use crate::{KindName, PATH_SEPARATOR, TreeDefinition, TreeEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("empty kind name under '{location}'")]
    EmptyKindName { location: String },
    #[error("kind '{kind}' under '{location}' contains the path separator")]
    KindContainsSeparator { location: String, kind: String },
    #[error("singleton kind '{location}' must not declare {field}")]
    SingletonWithKey {
        location: String,
        field: &'static str,
    },
    #[error(
        "root kind '{kind}' declares parentKey '{parent_key}' but a root step has no parent to take a key from"
    )]
    RootParentKey { kind: String, parent_key: String },
}

/// How a kind consumes path tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryShape {
    /// Exactly one instance, addressed by the kind token alone.
    Singleton,
    /// A collection addressed by kind token followed by a key token.
    Keyed {
        primary_key: Option<String>,
        parent_key: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub shape: EntryShape,
    pub substitute_with: Option<Value>,
    pub children: Option<SchemaLevel>,
}

impl SchemaNode {
    pub fn is_singleton(&self) -> bool {
        matches!(self.shape, EntryShape::Singleton)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaLevel {
    nodes: IndexMap<KindName, SchemaNode>,
}

impl SchemaLevel {
    pub fn get(&self, kind: &str) -> Option<&SchemaNode> {
        self.nodes.get(kind)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, KindName, SchemaNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A checked, immutable schema ready for path resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: SchemaLevel,
    definition: TreeDefinition,
}

impl Schema {
    pub fn compile(definition: &TreeDefinition) -> Result<Self, SchemaError> {
        let root = compile_level(definition, None)?;
        log::debug!("compiled schema with {} root kinds", root.len());
        Ok(Schema {
            root,
            definition: definition.clone(),
        })
    }

    pub fn root(&self) -> &SchemaLevel {
        &self.root
    }

    /// The authored definition this schema was compiled from.
    pub fn definition(&self) -> &TreeDefinition {
        &self.definition
    }

    /// Every kind name defined anywhere in the schema, first occurrence order.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds = IndexSet::new();
        collect_kinds(&self.root, &mut kinds);
        kinds.into_iter().collect()
    }
}

impl TryFrom<&TreeDefinition> for Schema {
    type Error = SchemaError;

    fn try_from(definition: &TreeDefinition) -> Result<Self, Self::Error> {
        Schema::compile(definition)
    }
}

fn collect_kinds<'a>(level: &'a SchemaLevel, out: &mut IndexSet<&'a str>) {
    for (kind, node) in level.iter() {
        out.insert(kind.as_str());
        if let Some(children) = &node.children {
            collect_kinds(children, out);
        }
    }
}

fn compile_level(
    definition: &TreeDefinition,
    location: Option<&str>,
) -> Result<SchemaLevel, SchemaError> {
    let mut nodes = IndexMap::with_capacity(definition.len());
    for (kind, entry) in definition {
        let here = match location {
            Some(parent) => format!("{parent}{PATH_SEPARATOR}{kind}"),
            None => kind.clone(),
        };
        if kind.is_empty() {
            return Err(SchemaError::EmptyKindName {
                location: location.unwrap_or("<root>").to_string(),
            });
        }
        if kind.contains(PATH_SEPARATOR) {
            return Err(SchemaError::KindContainsSeparator {
                location: location.unwrap_or("<root>").to_string(),
                kind: kind.clone(),
            });
        }

        let shape = compile_shape(kind, entry, &here, location.is_none())?;
        let children = entry
            .children
            .as_ref()
            .map(|children| compile_level(children, Some(&here)))
            .transpose()?;
        nodes.insert(
            kind.clone(),
            SchemaNode {
                shape,
                substitute_with: entry.substitute_with.clone(),
                children,
            },
        );
    }
    Ok(SchemaLevel { nodes })
}

fn compile_shape(
    kind: &str,
    entry: &TreeEntry,
    location: &str,
    at_root: bool,
) -> Result<EntryShape, SchemaError> {
    if entry.is_singleton() {
        if entry.primary_key.is_some() {
            return Err(SchemaError::SingletonWithKey {
                location: location.to_string(),
                field: "primaryKey",
            });
        }
        if entry.parent_key.is_some() {
            return Err(SchemaError::SingletonWithKey {
                location: location.to_string(),
                field: "parentKey",
            });
        }
        return Ok(EntryShape::Singleton);
    }

    if let (true, Some(parent_key)) = (at_root, &entry.parent_key) {
        return Err(SchemaError::RootParentKey {
            kind: kind.to_string(),
            parent_key: parent_key.clone(),
        });
    }

    Ok(EntryShape::Keyed {
        primary_key: entry.primary_key.clone(),
        parent_key: entry.parent_key.clone(),
    })
}

#[cfg(test)]
impl Schema {
    /// A one-kind schema that bypasses compile-time checks.
    pub(crate) fn unchecked_keyed_root(kind: &str, parent_key: &str) -> Schema {
        let mut nodes = IndexMap::new();
        nodes.insert(
            kind.to_string(),
            SchemaNode {
                shape: EntryShape::Keyed {
                    primary_key: Some("id".into()),
                    parent_key: Some(parent_key.into()),
                },
                substitute_with: None,
                children: None,
            },
        );
        Schema {
            root: SchemaLevel { nodes },
            definition: TreeDefinition::default(),
        }
    }
}
