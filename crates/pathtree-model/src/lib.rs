//! Typed, path-tagged model instances built from a schema, plus the writer that
//! grafts them into an in-memory object tree.

mod builder;
pub mod config;
mod error;
pub mod graft;
pub mod json_tree;
mod pathed;
pub mod registry;
pub mod tree;

pub use builder::build;
pub use config::{EngineConfig, KeyMismatchPolicy};
pub use error::ModelError;
pub use graft::{GraftReport, KeyMismatch, KeyRole, graft};
pub use pathed::{BuiltModel, Pathed};
pub use registry::{Factory, FactoryError, ModelRegistry, RegistryBuilder, RegistryError};
pub use tree::{GraftTarget, ObjectTree, TreeNode};
