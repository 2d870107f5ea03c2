//! Declarative object-tree schemas: authoring, fragment merging, compilation and
//! resolution of dot-delimited paths into the chain of entity identities they name.

mod compile;
pub mod merge;
mod model;
mod path;
pub mod schemas;
pub mod walk;

pub use compile::{EntryShape, Schema, SchemaError, SchemaLevel, SchemaNode};
pub use merge::{merge, merge_all};
pub use model::*;
pub use path::{PATH_SEPARATOR, PathError, TreePath};
pub use walk::{ObjectValues, PathData, WalkError, walk, walk_path, walk_with};

#[cfg(test)]
mod tests;
