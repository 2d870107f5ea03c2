//! Per-kind model factories.
//!
//! A registry maps kind names to constructors producing the host's model type
//! `M` from a raw JSON payload. [`RegistryBuilder::finish_for`] checks the
//! registry against a schema when it is composed, so an unregistered kind is a
//! startup error rather than a failure on first use.

use std::{collections::HashSet, fmt};

use indexmap::IndexMap;
use pathtree_schema::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub type Factory<M> = Box<dyn Fn(&Value) -> Result<M, FactoryError> + Send + Sync>;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("payload does not match model shape: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
    #[error("not yet implemented")]
    NotImplemented,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no factory registered for kinds: {}", .kinds.join(", "))]
    Unregistered { kinds: Vec<String> },
    #[error("factory registered for kind '{kind}' which the schema does not define")]
    UnknownKind { kind: String },
    #[error("duplicate factory for kind '{kind}'")]
    Duplicate { kind: String },
}

pub struct ModelRegistry<M> {
    factories: IndexMap<String, Factory<M>>,
}

impl<M> fmt::Debug for ModelRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<M: 'static> ModelRegistry<M> {
    pub fn builder() -> RegistryBuilder<M> {
        RegistryBuilder {
            factories: IndexMap::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn get(&self, kind: &str) -> Option<&Factory<M>> {
        self.factories.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Run the factory for `kind`; `None` when no factory is registered.
    pub fn create(&self, kind: &str, data: &Value) -> Option<Result<M, FactoryError>> {
        self.get(kind).map(|factory| factory(data))
    }
}

impl ModelRegistry<Value> {
    /// Registry that accepts any JSON object payload for every kind in `schema`.
    /// Used where models are handled as untyped records.
    pub fn json_records(schema: &Schema) -> Self {
        let mut builder = ModelRegistry::builder();
        for kind in schema.kinds() {
            builder = builder.register(kind, json_record);
        }
        ModelRegistry {
            factories: builder.factories,
        }
    }
}

fn json_record(data: &Value) -> Result<Value, FactoryError> {
    match data {
        Value::Object(fields) => {
            let mut fields = fields.clone();
            // The builder re-tags the record; a stale tag would shadow it.
            fields.remove("path");
            Ok(Value::Object(fields))
        }
        other => Err(FactoryError::Invalid(format!(
            "expected a JSON object payload, found {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub struct RegistryBuilder<M> {
    factories: IndexMap<String, Factory<M>>,
    duplicates: Vec<String>,
}

impl<M: 'static> RegistryBuilder<M> {
    pub fn register<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Value) -> Result<M, FactoryError> + Send + Sync + 'static,
    {
        let kind = kind.into();
        if self.factories.contains_key(&kind) {
            self.duplicates.push(kind.clone());
        }
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Register a factory that deserializes the payload into `T` and converts it
    /// into the registry's model type.
    pub fn register_serde<T>(self, kind: impl Into<String>) -> Self
    where
        T: DeserializeOwned + Into<M> + 'static,
    {
        self.register(kind, |data: &Value| {
            let model: T = serde_json::from_value(data.clone())?;
            Ok(model.into())
        })
    }

    /// Register a kind that is known to the schema but cannot be built yet.
    pub fn register_unimplemented(self, kind: impl Into<String>) -> Self {
        self.register(kind, |_: &Value| Err(FactoryError::NotImplemented))
    }

    /// Finish without checking coverage against a schema.
    pub fn finish(self) -> Result<ModelRegistry<M>, RegistryError> {
        if let Some(kind) = self.duplicates.into_iter().next() {
            return Err(RegistryError::Duplicate { kind });
        }
        Ok(ModelRegistry {
            factories: self.factories,
        })
    }

    /// Finish, requiring exactly the kinds that `schema` defines.
    pub fn finish_for(self, schema: &Schema) -> Result<ModelRegistry<M>, RegistryError> {
        let defined: HashSet<&str> = schema.kinds().into_iter().collect();
        if let Some(kind) = self.factories.keys().find(|kind| !defined.contains(kind.as_str())) {
            return Err(RegistryError::UnknownKind { kind: kind.clone() });
        }
        let missing: Vec<String> = schema
            .kinds()
            .into_iter()
            .filter(|kind| !self.factories.contains_key(*kind))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(RegistryError::Unregistered { kinds: missing });
        }
        self.finish()
    }
}
