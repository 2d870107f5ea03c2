use pathtree_schema::{PathError, WalkError};
use thiserror::Error;

use crate::{KeyMismatch, registry::FactoryError};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("no factory registered for kind '{kind}' at {path}")]
    UnregisteredKind { kind: String, path: String },
    #[error("factory for kind '{kind}' failed at {path}: {source}")]
    Factory {
        kind: String,
        path: String,
        #[source]
        source: FactoryError,
    },
    #[error("payload keys disagree with {path}: {}", join_mismatches(.mismatches))]
    KeyMismatch {
        path: String,
        mismatches: Vec<KeyMismatch>,
    },
    #[error("no container at '{container}' to place '{name}' into")]
    MissingContainer { container: String, name: String },
    #[error("'{name}' is reserved for the model marker and cannot name a tree slot")]
    ReservedName { name: String },
    #[error("failed to encode model for the tree: {0}")]
    Encode(#[from] serde_json::Error),
}

fn join_mismatches(mismatches: &[KeyMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
