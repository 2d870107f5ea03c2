use serde_json::json;

use super::{assert_json_schema, json_schema_accepts, planning_definition, planning_schema};
use crate::{TreeDefinition, schemas, walk};

#[test]
fn authored_definition_matches_document_schema() {
    let value = serde_json::to_value(planning_definition()).expect("serialize");
    assert_json_schema(schemas::TREE_DEFINITION, &value);
}

#[test]
fn document_schema_rejects_unknown_entry_fields() {
    let bad = json!({ "root": { "singleton": true, "primary": "id" } });
    assert!(!json_schema_accepts(schemas::TREE_DEFINITION, &bad));
    assert!(serde_json::from_value::<TreeDefinition>(bad).is_err());
}

#[test]
fn document_schema_rejects_dotted_kind_names() {
    let bad = json!({ "root.plan": { "primaryKey": "id" } });
    assert!(!json_schema_accepts(schemas::TREE_DEFINITION, &bad));
}

#[test]
fn walk_output_matches_path_data_schema() {
    let schema = planning_schema();
    let steps = walk(&schema, "root.plan.p1.commitment.c1").expect("walk");
    let value = serde_json::to_value(&steps).expect("serialize");
    assert_json_schema(schemas::PATH_DATA, &value);
}

#[test]
fn find_is_case_insensitive() {
    assert!(schemas::find("tree_definition").is_some());
    assert!(schemas::find("PATH_DATA").is_some());
    assert!(schemas::find("missing").is_none());
}
