//! In-memory object trees that built models are grafted into.
//!
//! Lookup follows property-path semantics over the same dot grammar the walker
//! uses: every token selects a child by name. `root.plan.p1` is the node named
//! `p1` inside `plan` inside `root`.

use indexmap::IndexMap;
use pathtree_schema::TreePath;
use serde::Serialize;

use crate::{BuiltModel, ModelError};

/// Serialized key of a node's model; never valid as a child name.
pub const VALUE_KEY: &str = "$value";

/// A tree that can resolve a container path and hold a model under a name.
pub trait GraftTarget<M> {
    /// Place `model` under `name` inside the container at `container`, or at the
    /// tree root when `container` is `None`. With `create_missing`, absent
    /// containers along the way are created.
    fn place(
        &mut self,
        container: Option<&TreePath>,
        name: &str,
        model: BuiltModel<M>,
        create_missing: bool,
    ) -> Result<(), ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound(serialize = "M: Serialize"))]
pub struct TreeNode<M> {
    #[serde(rename = "$value", skip_serializing_if = "Option::is_none")]
    pub value: Option<BuiltModel<M>>,
    #[serde(flatten)]
    pub children: IndexMap<String, TreeNode<M>>,
}

impl<M> Default for TreeNode<M> {
    fn default() -> Self {
        TreeNode {
            value: None,
            children: IndexMap::new(),
        }
    }
}

impl<M> TreeNode<M> {
    pub fn child(&self, name: &str) -> Option<&TreeNode<M>> {
        self.children.get(name)
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a BuiltModel<M>>) {
        if let Some(value) = &self.value {
            out.push(value);
        }
        for child in self.children.values() {
            child.collect(out);
        }
    }
}

/// Typed object tree keyed by path tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent, bound(serialize = "M: Serialize"))]
pub struct ObjectTree<M> {
    root: TreeNode<M>,
}

impl<M> Default for ObjectTree<M> {
    fn default() -> Self {
        ObjectTree {
            root: TreeNode::default(),
        }
    }
}

impl<M> ObjectTree<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &TreeNode<M> {
        &self.root
    }

    pub fn get(&self, path: &TreePath) -> Option<&TreeNode<M>> {
        path.tokens()
            .try_fold(&self.root, |node, token| node.children.get(token))
    }

    pub fn get_mut(&mut self, path: &TreePath) -> Option<&mut TreeNode<M>> {
        path.tokens()
            .try_fold(&mut self.root, |node, token| node.children.get_mut(token))
    }

    /// The model stored at `path`, if any.
    pub fn model(&self, path: &TreePath) -> Option<&BuiltModel<M>> {
        self.get(path)?.value.as_ref()
    }

    /// Resolve the container at `path` (the root for `None`), creating missing
    /// nodes when `create` is set.
    pub fn container_mut(
        &mut self,
        path: Option<&TreePath>,
        create: bool,
    ) -> Option<&mut TreeNode<M>> {
        let Some(path) = path else {
            return Some(&mut self.root);
        };
        if !create {
            return self.get_mut(path);
        }
        if path.tokens().any(|token| token == VALUE_KEY) {
            return None;
        }
        let mut node = &mut self.root;
        for token in path.tokens() {
            node = node.children.entry(token.to_string()).or_default();
        }
        Some(node)
    }

    /// Store `model` under `name`, keeping any children already at that slot.
    pub fn insert(
        &mut self,
        container: Option<&TreePath>,
        name: &str,
        model: BuiltModel<M>,
    ) -> Result<(), ModelError> {
        self.place(container, name, model, false)
    }

    pub fn remove(&mut self, path: &TreePath) -> Option<TreeNode<M>> {
        let parent = match path.parent() {
            Some(parent) => self.get_mut(&parent)?,
            None => &mut self.root,
        };
        parent.children.shift_remove(path.last_token())
    }

    /// Models in depth-first insertion order.
    pub fn models(&self) -> Vec<&BuiltModel<M>> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out
    }

    /// Number of nodes holding a model.
    pub fn len(&self) -> usize {
        self.models().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> GraftTarget<M> for ObjectTree<M> {
    fn place(
        &mut self,
        container: Option<&TreePath>,
        name: &str,
        model: BuiltModel<M>,
        create_missing: bool,
    ) -> Result<(), ModelError> {
        let reserved = std::iter::once(name)
            .chain(container.into_iter().flat_map(TreePath::tokens))
            .find(|token| *token == VALUE_KEY);
        if let Some(token) = reserved {
            return Err(ModelError::ReservedName {
                name: token.to_string(),
            });
        }
        let node = self
            .container_mut(container, create_missing)
            .ok_or_else(|| ModelError::MissingContainer {
                container: container.map(ToString::to_string).unwrap_or_default(),
                name: name.to_string(),
            })?;
        node.children.entry(name.to_string()).or_default().value = Some(model);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pathed;
    use serde_json::{Value, json};

    fn path(s: &str) -> TreePath {
        TreePath::new(s).unwrap()
    }

    fn instance(p: &str, value: Value) -> BuiltModel<Value> {
        BuiltModel::Instance(Pathed::new(value, path(p)))
    }

    #[test]
    fn insert_requires_existing_container() {
        let mut tree = ObjectTree::new();
        let err = tree
            .insert(Some(&path("root.plan")), "p1", instance("root.plan.p1", json!({})))
            .unwrap_err();
        assert!(matches!(err, ModelError::MissingContainer { ref container, .. } if container == "root.plan"));
        assert!(tree.is_empty());
    }

    #[test]
    fn place_creates_containers_when_asked() {
        let mut tree = ObjectTree::new();
        tree.place(
            Some(&path("root.plan")),
            "p1",
            instance("root.plan.p1", json!({ "id": "p1" })),
            true,
        )
        .unwrap();
        let model = tree.model(&path("root.plan.p1")).expect("model");
        assert_eq!(model.path().as_str(), "root.plan.p1");
        assert!(tree.get(&path("root.plan")).unwrap().value.is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn replacing_a_model_keeps_children() {
        let mut tree = ObjectTree::new();
        tree.insert(None, "root", instance("root", json!({ "v": 1 }))).unwrap();
        tree.place(Some(&path("root.plan")), "p1", instance("root.plan.p1", json!({})), true)
            .unwrap();
        tree.insert(None, "root", instance("root", json!({ "v": 2 }))).unwrap();
        assert_eq!(tree.len(), 2);
        let root = tree.model(&path("root")).unwrap().as_instance().unwrap();
        assert_eq!(root.value, json!({ "v": 2 }));
    }

    #[test]
    fn value_marker_is_not_a_slot_name() {
        let mut tree = ObjectTree::new();
        let err = tree
            .place(Some(&path("root.plan")), VALUE_KEY, instance("root.plan", json!({})), true)
            .unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { ref name } if name == "$value"));
        let err = tree
            .place(Some(&path("root.$value")), "p1", instance("root.$value.p1", json!({})), true)
            .unwrap_err();
        assert!(matches!(err, ModelError::ReservedName { .. }));
        assert!(tree.is_empty());
        assert!(tree.get(&path("root")).is_none());
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut tree = ObjectTree::new();
        tree.place(Some(&path("root.plan")), "p1", instance("root.plan.p1", json!({})), true)
            .unwrap();
        let removed = tree.remove(&path("root.plan")).expect("removed");
        assert!(removed.child("p1").is_some());
        assert!(tree.get(&path("root.plan")).is_none());
        assert!(tree.remove(&path("root.plan")).is_none());
    }

    #[test]
    fn serializes_nested_with_values_marked() {
        let mut tree = ObjectTree::new();
        tree.place(Some(&path("root.plan")), "p1", instance("root.plan.p1", json!({ "id": "p1" })), true)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({ "root": { "plan": { "p1": { "$value": { "path": "root.plan.p1", "id": "p1" } } } } })
        );
    }
}
