//! Composition of schema fragments.
//!
//! Merging is field-by-field: a field only overwrites when the incoming fragment
//! actually carries it, so partial fragments never erase detail supplied earlier.
//! Both inputs are left untouched; the result is freshly owned.

use crate::{TreeDefinition, TreeEntry};

/// Merge `fragment` on top of `base`.
pub fn merge(base: &TreeDefinition, fragment: &TreeDefinition) -> TreeDefinition {
    let mut merged = base.clone();
    merge_into(&mut merged, fragment);
    merged
}

/// Fold fragments left to right, starting from an empty definition.
pub fn merge_all<'a, I>(fragments: I) -> TreeDefinition
where
    I: IntoIterator<Item = &'a TreeDefinition>,
{
    let mut merged = TreeDefinition::default();
    for fragment in fragments {
        merge_into(&mut merged, fragment);
    }
    merged
}

fn merge_into(target: &mut TreeDefinition, fragment: &TreeDefinition) {
    for (kind, incoming) in fragment {
        match target.entries.get_mut(kind) {
            Some(existing) => {
                log::trace!("merging fragment entry '{kind}' into existing definition");
                merge_entry(existing, incoming);
            }
            None => {
                target.entries.insert(kind.clone(), incoming.clone());
            }
        }
    }
}

fn merge_entry(existing: &mut TreeEntry, incoming: &TreeEntry) {
    if incoming.singleton.is_some() {
        existing.singleton = incoming.singleton;
    }
    if incoming.primary_key.is_some() {
        existing.primary_key = incoming.primary_key.clone();
    }
    if incoming.parent_key.is_some() {
        existing.parent_key = incoming.parent_key.clone();
    }
    if incoming.substitute_with.is_some() {
        existing.substitute_with = incoming.substitute_with.clone();
    }

    if let Some(more) = &incoming.children {
        match existing.children.as_mut() {
            Some(children) => merge_into(children, more),
            None => existing.children = Some(more.clone()),
        }
    }
}
