//! Conversion of uploaded or fetched JSON into canonical [`Node`] trees.
//!
//! Two document shapes are accepted:
//!
//! * a flat array of nodes, each carrying `id`, `name`, `type` and optional
//!   `children`, which is validated node by node;
//! * a wrapped object `{ "enterpriseDataViewer": <node>, "mapView": ... }`
//!   whose single root is transformed, with ids derived from names and types
//!   inferred from the node's shape.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        map::MapView,
        node::{Node, NodeType},
    },
};

const WRAPPED_ROOT_KEY: &str = "enterpriseDataViewer";
const WRAPPED_MAP_KEY: &str = "mapView";
const UNNAMED: &str = "Unnamed";
const GENERATED_ID_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeDocument {
    pub roots: Vec<Node>,
    pub map_view: Option<MapView>,
}

impl TreeDocument {
    pub fn builtin() -> Self {
        Self {
            roots: super::defaults::default_tree(),
            map_view: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }
}

/// Parses raw bytes and normalizes the result.
pub fn parse_document(bytes: &[u8]) -> Result<TreeDocument, AppError> {
    let value: Value = serde_json::from_slice(bytes).map_err(AppError::InvalidJson)?;
    document_from_value(value)
}

pub fn document_from_value(value: Value) -> Result<TreeDocument, AppError> {
    match value {
        Value::Array(items) => Ok(TreeDocument {
            roots: normalize_nodes(&items),
            map_view: None,
        }),
        Value::Object(mut fields) => {
            let root = match fields.remove(WRAPPED_ROOT_KEY) {
                Some(Value::Object(root)) => root,
                Some(other) => {
                    return Err(AppError::UnrecognizedShape(format!(
                        "{WRAPPED_ROOT_KEY} must be an object, found {}",
                        describe(&other)
                    )));
                }
                None => {
                    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
                    return Err(AppError::UnrecognizedShape(format!(
                        "expected an array of nodes or an object with {WRAPPED_ROOT_KEY}, found keys [{}]",
                        keys.join(", ")
                    )));
                }
            };

            let map_view = match fields.remove(WRAPPED_MAP_KEY) {
                None | Some(Value::Null) => None,
                Some(raw) => Some(serde_json::from_value::<MapView>(raw).map_err(|err| {
                    AppError::UnrecognizedShape(format!("invalid {WRAPPED_MAP_KEY}: {err}"))
                })?),
            };

            Ok(TreeDocument {
                roots: vec![transform_wrapped(&root, "")],
                map_view,
            })
        }
        other => Err(AppError::UnrecognizedShape(format!(
            "expected an array of nodes or an object with {WRAPPED_ROOT_KEY}, found {}",
            describe(&other)
        ))),
    }
}

/// Validates a flat array of raw nodes.
pub fn normalize_nodes(items: &[Value]) -> Vec<Node> {
    items.iter().map(normalize_node).collect()
}

fn normalize_node(raw: &Value) -> Node {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let kind = fields
        .get("type")
        .and_then(Value::as_str)
        .and_then(NodeType::from_raw)
        .unwrap_or(NodeType::Folder);

    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => generate_id(),
    };

    let name = match fields.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => UNNAMED.to_string(),
    };

    let children = match fields.get("children") {
        Some(Value::Array(children)) => normalize_nodes(children),
        _ => Vec::new(),
    };

    Node {
        id,
        name,
        kind,
        children,
    }
}

fn transform_wrapped(raw: &Map<String, Value>, id_prefix: &str) -> Node {
    let name = match raw.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => UNNAMED.to_string(),
    };
    let id = format!("{id_prefix}{}", slugify(&name));

    let children: Vec<&Value> = match raw.get("children") {
        Some(Value::Array(children)) => children.iter().collect(),
        _ => Vec::new(),
    };

    let kind = match raw.get("type").filter(|value| is_truthy(value)) {
        Some(Value::String(kind)) if kind == "file" => NodeType::File,
        Some(Value::String(kind)) if kind == "schema" => NodeType::Schema,
        Some(_) => NodeType::Folder,
        None if name.contains("DB") || name.contains("Database") => NodeType::Database,
        None if children.is_empty() => NodeType::File,
        None => NodeType::Folder,
    };

    let empty = Map::new();
    let children = children
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            let fields = child.as_object().unwrap_or(&empty);
            transform_wrapped(fields, &format!("{id}-{index}-"))
        })
        .collect();

    Node {
        id,
        name,
        kind,
        children,
    }
}

/// Collapses whitespace runs into `-` and lowercases the rest.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

fn generate_id() -> String {
    let mut raw = Uuid::new_v4().simple().to_string();
    raw.truncate(GENERATED_ID_LEN);
    format!("node-{raw}")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_types_become_folders() {
        let nodes = normalize_nodes(&[
            json!({"id": "a", "name": "A", "type": "view"}),
            json!({"id": "b", "name": "B", "type": 3}),
            json!({"id": "c", "name": "C"}),
            json!({"id": "d", "name": "D", "type": "Bucket"}),
        ]);
        assert!(nodes.iter().all(|node| node.kind == NodeType::Folder));
    }

    #[test]
    fn allowed_types_are_kept() {
        let nodes = normalize_nodes(&[
            json!({"id": "a", "name": "A", "type": "table"}),
            json!({"id": "b", "name": "B", "type": "server"}),
            json!({"id": "c", "name": "C", "type": "region"}),
        ]);
        let kinds: Vec<NodeType> = nodes.iter().map(|node| node.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeType::Table, NodeType::Server, NodeType::Region]
        );
    }

    #[test]
    fn missing_ids_and_names_are_filled_in() {
        let nodes = normalize_nodes(&[json!({"type": "file"}), json!({"id": 42, "name": ""})]);

        let generated = &nodes[0].id;
        assert!(generated.starts_with("node-"));
        assert_eq!(generated.len(), "node-".len() + GENERATED_ID_LEN);
        assert!(
            generated["node-".len()..]
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
        );
        assert_eq!(nodes[0].name, "Unnamed");

        assert_eq!(nodes[1].id, "42");
        assert_eq!(nodes[1].name, "Unnamed");
    }

    #[test]
    fn children_are_normalized_recursively() {
        let nodes = normalize_nodes(&[json!({
            "id": "lake",
            "name": "Lake",
            "type": "database",
            "children": [
                {"id": "raw", "name": "Raw", "type": "nonsense", "children": [
                    {"name": "part-0.parquet", "type": "file"}
                ]},
                {"id": "bad", "name": "Bad", "children": "not-an-array"}
            ]
        })]);

        let lake = &nodes[0];
        assert_eq!(lake.children.len(), 2);
        assert_eq!(lake.children[0].kind, NodeType::Folder);
        assert_eq!(lake.children[0].children[0].kind, NodeType::File);
        assert!(lake.children[1].children.is_empty());
    }

    #[test]
    fn non_object_entries_become_placeholder_folders() {
        let nodes = normalize_nodes(&[json!("loose string")]);
        assert_eq!(nodes[0].name, "Unnamed");
        assert_eq!(nodes[0].kind, NodeType::Folder);
    }

    #[test]
    fn wrapped_documents_derive_ids_and_types() {
        let document = document_from_value(json!({
            "enterpriseDataViewer": {
                "name": "Enterprise  Data",
                "children": [
                    {"name": "Sales DB", "children": [{"name": "orders"}]},
                    {"name": "Staging", "children": [{"name": "x", "type": "schema"}]},
                    {"name": "readme.md", "type": "file"},
                    {"name": "Archive", "type": "bucket", "children": [{"name": "old"}]}
                ]
            }
        }))
        .unwrap();

        assert!(document.map_view.is_none());
        assert_eq!(document.roots.len(), 1);

        let root = &document.roots[0];
        assert_eq!(root.id, "enterprise-data");
        assert_eq!(root.kind, NodeType::Folder);

        let sales = &root.children[0];
        assert_eq!(sales.id, "enterprise-data-0-sales-db");
        assert_eq!(sales.kind, NodeType::Database);
        assert_eq!(sales.children[0].id, "enterprise-data-0-sales-db-0-orders");
        assert_eq!(sales.children[0].kind, NodeType::File);

        assert_eq!(root.children[1].kind, NodeType::Folder);
        assert_eq!(root.children[1].children[0].kind, NodeType::Schema);
        assert_eq!(root.children[2].kind, NodeType::File);
        assert_eq!(root.children[3].kind, NodeType::Folder);
    }

    #[test]
    fn wrapped_documents_keep_their_map_view() {
        let document = document_from_value(json!({
            "enterpriseDataViewer": {"name": "Root", "children": []},
            "mapView": {"worldMap": [{
                "city": "Johannesburg",
                "regions": [{"name": "Gauteng", "data": [
                    {"database": "Customer_DB", "tables": ["customers", "orders"]}
                ]}]
            }]}
        }))
        .unwrap();

        let map = document.map_view.expect("map view");
        assert_eq!(map.world_map[0].city, "Johannesburg");
        assert_eq!(map.table_count(), 2);
        assert_eq!(document.roots[0].kind, NodeType::File);
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for value in [
            json!({"nodes": []}),
            json!("tree"),
            json!(12),
            json!({"enterpriseDataViewer": [1, 2]}),
        ] {
            assert!(matches!(
                document_from_value(value),
                Err(AppError::UnrecognizedShape(_))
            ));
        }
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = parse_document(b"{ not json").unwrap_err();
        assert!(matches!(err, AppError::InvalidJson(_)));
        assert!(err.to_string().starts_with("Invalid JSON format"));
    }

    #[test]
    fn slugify_collapses_whitespace() {
        assert_eq!(slugify("Data  Lake\tZone"), "data-lake-zone");
        assert_eq!(slugify("HR"), "hr");
    }
}
