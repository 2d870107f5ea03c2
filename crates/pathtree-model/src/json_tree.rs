//! Plain JSON documents as object trees.
//!
//! Objects are traversed by key and arrays by numeric index. Grafting a model
//! writes its serialized form, `path` included, into the containing object.
//! When the slot already holds an object, the model's fields are merged into it
//! so nested containers under an existing record survive a re-graft.

use pathtree_schema::TreePath;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{BuiltModel, GraftTarget, ModelError};

pub fn lookup<'a>(tree: &'a Value, path: &TreePath) -> Option<&'a Value> {
    path.tokens().try_fold(tree, |node, token| match node {
        Value::Object(map) => map.get(token),
        Value::Array(items) => token.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

pub fn lookup_mut<'a>(tree: &'a mut Value, path: &TreePath) -> Option<&'a mut Value> {
    path.tokens().try_fold(tree, |node, token| match node {
        Value::Object(map) => map.get_mut(token),
        Value::Array(items) => match token.parse::<usize>() {
            Ok(index) => items.get_mut(index),
            Err(_) => None,
        },
        _ => None,
    })
}

/// True when every existing node along `path` is an object, so missing
/// containers can be created without overwriting data.
fn can_create(tree: &Value, path: &TreePath) -> bool {
    let mut node = tree;
    for token in path.tokens() {
        let Value::Object(map) = node else {
            return false;
        };
        match map.get(token) {
            Some(next) => node = next,
            None => return true,
        }
    }
    node.is_object()
}

fn ensure_container<'a>(tree: &'a mut Value, path: &TreePath) -> Option<&'a mut Map<String, Value>> {
    let mut node = tree;
    for token in path.tokens() {
        node = node
            .as_object_mut()?
            .entry(token.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    node.as_object_mut()
}

impl<M: Serialize> GraftTarget<M> for Value {
    fn place(
        &mut self,
        container: Option<&TreePath>,
        name: &str,
        model: BuiltModel<M>,
        create_missing: bool,
    ) -> Result<(), ModelError> {
        let missing = || ModelError::MissingContainer {
            container: container.map(ToString::to_string).unwrap_or_default(),
            name: name.to_string(),
        };
        let encoded = serde_json::to_value(&model)?;

        let slot = match container {
            None => self.as_object_mut(),
            Some(path) if create_missing && can_create(self, path) => ensure_container(self, path),
            Some(path) => lookup_mut(self, path).and_then(Value::as_object_mut),
        }
        .ok_or_else(missing)?;
        let replacement = match (slot.get_mut(name), encoded) {
            (Some(Value::Object(existing)), Value::Object(fields)) => {
                existing.extend(fields);
                None
            }
            (_, encoded) => Some(encoded),
        };
        if let Some(encoded) = replacement {
            slot.insert(name.to_string(), encoded);
        }
        Ok(())
    }
}
