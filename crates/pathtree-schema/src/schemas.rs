//! Embedded JSON Schema documents. Source of truth lives under `schemas/`.

macro_rules! embed_schema {
    ($($const:ident => $path:literal),+ $(,)?) => {
        $(pub const $const: &str = include_str!($path);)+

        pub const ALL: &[SchemaDoc] = &[
            $(SchemaDoc { name: stringify!($const), json: $const },)+
        ];
    };
}

#[derive(Debug, Clone, Copy)]
pub struct SchemaDoc {
    pub name: &'static str,
    pub json: &'static str,
}

embed_schema! {
    TREE_DEFINITION => "../../../schemas/tree-definition.schema.json",
    PATH_DATA => "../../../schemas/path-data.schema.json",
}

pub fn find(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|doc| doc.name.eq_ignore_ascii_case(name))
        .map(|doc| doc.json)
}
