use jsonschema::{JSONSchema, paths::JSONPointer};
use serde_json::{Value, json};

use crate::{Schema, TreeDefinition};

pub mod merge;
pub mod schemas;

pub(crate) fn assert_json_schema(schema_json: &str, instance: &Value) {
    let schema_value: Value =
        serde_json::from_str(schema_json).expect("embedded schema must be valid JSON");
    let compiled = JSONSchema::options()
        .compile(&schema_value)
        .expect("embedded schema must compile successfully");
    if let Err(errors) = compiled.validate(instance) {
        let mut messages = Vec::new();
        for err in errors {
            messages.push(format!("{}: {}", format_pointer(&err.instance_path), err));
        }
        panic!(
            "schema validation failed: {}\ninstance: {}",
            messages.join("; "),
            instance
        );
    }
}

pub(crate) fn json_schema_accepts(schema_json: &str, instance: &Value) -> bool {
    let schema_value: Value = serde_json::from_str(schema_json).expect("valid JSON");
    JSONSchema::compile(&schema_value)
        .expect("schema compiles")
        .is_valid(instance)
}

fn format_pointer(pointer: &JSONPointer) -> String {
    let text = pointer.to_string();
    if text.is_empty() { "/".into() } else { text }
}

/// Planning tree used across the tests: a singleton root holding agents and
/// plans, plans holding commitments and display nodes.
pub(crate) fn planning_definition() -> TreeDefinition {
    serde_json::from_value(json!({
        "root": {
            "singleton": true,
            "children": {
                "agent": { "primaryKey": "id" },
                "plan": {
                    "primaryKey": "id",
                    "children": {
                        "commitment": { "primaryKey": "id", "parentKey": "planId" },
                        "displayNode": { "primaryKey": "id", "parentKey": "planId" }
                    }
                }
            }
        }
    }))
    .expect("planning definition")
}

pub(crate) fn planning_schema() -> Schema {
    Schema::compile(&planning_definition()).expect("planning schema compiles")
}
