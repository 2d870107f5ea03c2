use serde_json::json;

use super::planning_definition;
use crate::{TreeDefinition, TreeEntry, merge, merge_all};

fn def(value: serde_json::Value) -> TreeDefinition {
    serde_json::from_value(value).expect("definition")
}

#[test]
fn absent_kinds_are_copied_verbatim() {
    let a = def(json!({ "root": { "singleton": true } }));
    let b = def(json!({ "agent": { "primaryKey": "id", "substituteWith": { "type": "Agent" } } }));
    let merged = merge(&a, &b);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("agent"), b.get("agent"));
}

#[test]
fn only_present_fields_overwrite() {
    let a = def(json!({ "plan": { "primaryKey": "id", "parentKey": "rootId" } }));
    let b = def(json!({ "plan": { "parentKey": "ownerId" } }));
    let merged = merge(&a, &b);
    let plan = merged.get("plan").unwrap();
    assert_eq!(plan.primary_key.as_deref(), Some("id"));
    assert_eq!(plan.parent_key.as_deref(), Some("ownerId"));
    assert_eq!(plan.singleton, None);
}

#[test]
fn children_merge_recursively() {
    let a = def(json!({
        "root": { "singleton": true, "children": { "plan": { "primaryKey": "id" } } }
    }));
    let b = def(json!({
        "root": { "children": {
            "plan": { "children": { "commitment": { "primaryKey": "id", "parentKey": "planId" } } },
            "agent": { "primaryKey": "id" }
        } }
    }));
    let merged = merge(&a, &b);
    let root = merged.get("root").unwrap();
    assert!(root.is_singleton());
    let children = root.children.as_ref().unwrap();
    assert_eq!(children.get("plan").unwrap().primary_key.as_deref(), Some("id"));
    assert!(children.contains("agent"));
    let plan_children = children.get("plan").unwrap().children.as_ref().unwrap();
    assert_eq!(
        plan_children.get("commitment").unwrap().parent_key.as_deref(),
        Some("planId")
    );
}

#[test]
fn children_adopted_when_base_has_none() {
    let a = def(json!({ "plan": { "primaryKey": "id" } }));
    let b = def(json!({ "plan": { "children": { "process": { "primaryKey": "id" } } } }));
    let merged = merge(&a, &b);
    assert!(merged.get("plan").unwrap().children.as_ref().unwrap().contains("process"));
}

#[test]
fn inputs_are_not_mutated() {
    let a = planning_definition();
    let b = def(json!({ "root": { "children": { "plan": { "primaryKey": "planId" } } } }));
    let (a_before, b_before) = (a.clone(), b.clone());
    let merged = merge(&a, &b);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
    assert_ne!(merged, a);
}

#[test]
fn merging_empty_fragment_is_identity() {
    let a = planning_definition();
    assert_eq!(merge(&a, &TreeDefinition::new()), a);
    assert_eq!(merge(&TreeDefinition::new(), &a), a);
}

#[test]
fn merge_all_folds_left_to_right() {
    let base = TreeDefinition::new().with("root", TreeEntry::singleton());
    let first = TreeDefinition::new().with("agent", TreeEntry::keyed("id"));
    let second = TreeDefinition::new().with("agent", TreeEntry::keyed("agentId"));
    let merged = merge_all([&base, &first, &second]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get("agent").unwrap().primary_key.as_deref(), Some("agentId"));
    assert_eq!(base.merged(&first), merge(&base, &first));
}

#[test]
fn absent_fields_survive_serde_round_trip() {
    let fragment = def(json!({ "plan": { "parentKey": "ownerId" } }));
    let json = serde_json::to_value(&fragment).unwrap();
    assert_eq!(json, json!({ "plan": { "parentKey": "ownerId" } }));
}
