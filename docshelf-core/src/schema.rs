//! Schema introspection.
//!
//! Collection schemas are stored as raw JSON values, but a handful of
//! structural questions come up everywhere: which properties are
//! sub-collections, what is the item schema of one, what does the schema
//! look like without its sub-collections or with required fields relaxed.
//! This module answers those questions by classifying schema nodes into a
//! small tagged union and matching on it exhaustively.

use serde_json::{Map, Value, json};

/// A classified JSON-Schema node.
///
/// Covers the four shapes the store cares about. Classification is by
/// structure, not by full dialect semantics: a `$ref` wins over everything,
/// then the declared `type`, and a node with a `properties` table counts as
/// an object even when it omits `type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaNode<'a> {
    /// A `$ref` pointer into a sibling definitions table.
    Ref(&'a str),
    /// An array schema, with its item schema when declared.
    Array(Option<&'a Value>),
    /// An object schema, with its properties table when declared.
    Object(Option<&'a Map<String, Value>>),
    /// A scalar schema (`string`, `number`, `integer`, `boolean`, ...).
    Simple(Option<&'a str>),
}

impl<'a> SchemaNode<'a> {
    /// Classifies a schema value.
    pub fn classify(schema: &'a Value) -> Self {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return Self::Ref(reference);
        }
        match schema.get("type").and_then(Value::as_str) {
            Some("array") => Self::Array(schema.get("items")),
            Some("object") => Self::Object(schema.get("properties").and_then(Value::as_object)),
            other => match schema.get("properties").and_then(Value::as_object) {
                Some(properties) => Self::Object(Some(properties)),
                None => Self::Simple(other),
            },
        }
    }
}

/// Whether `schema` describes an array of objects, the shape that turns a
/// property into a sub-collection.
fn is_sub_collection_schema(schema: &Value) -> bool {
    match SchemaNode::classify(schema) {
        SchemaNode::Array(Some(items)) => {
            matches!(SchemaNode::classify(items), SchemaNode::Object(_))
        }
        _ => false,
    }
}

/// Property names of `schema` that designate sub-collections.
///
/// Order follows the property table, so callers see a stable key list for
/// a given schema.
pub fn sub_collection_keys(schema: &Value) -> Vec<String> {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Vec::new();
    };
    properties
        .iter()
        .filter(|(_, prop)| is_sub_collection_schema(prop))
        .map(|(name, _)| name.clone())
        .collect()
}

/// The item schema of sub-collection `key`, or `None` when `key` does not
/// name one.
pub fn sub_schema<'a>(schema: &'a Value, key: &str) -> Option<&'a Value> {
    let prop = schema.get("properties")?.get(key)?;
    if is_sub_collection_schema(prop) {
        prop.get("items")
    } else {
        None
    }
}

/// Flags for [`project_schema`]. Each is independent; all default off.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaProjection {
    /// Drop sub-collection properties and their `required` entries. This is
    /// the shape of a stored top-level record.
    pub without_sub_collections: bool,
    /// Suppress required-field enforcement (`required` becomes empty).
    pub partial: bool,
    /// Add the `_id` string property that read paths attach.
    pub with_id: bool,
}

/// Derives a flattened variant of `schema` for validating partial or
/// id-carrying payloads, or for describing stored records to callers.
pub fn project_schema(schema: &Value, projection: SchemaProjection) -> Value {
    let mut out = schema.clone();
    let Some(target) = out.as_object_mut() else {
        return out;
    };

    if projection.without_sub_collections {
        let subs = sub_collection_keys(schema);
        if let Some(properties) = target.get_mut("properties").and_then(Value::as_object_mut) {
            for key in &subs {
                properties.remove(key);
            }
        }
        if let Some(required) = target.get_mut("required").and_then(Value::as_array_mut) {
            required.retain(|entry| {
                entry
                    .as_str()
                    .is_none_or(|name| !subs.iter().any(|key| key == name))
            });
        }
    }

    if projection.partial && target.contains_key("required") {
        target.insert("required".to_string(), json!([]));
    }

    if projection.with_id {
        if let Some(properties) = target.get_mut("properties").and_then(Value::as_object_mut) {
            properties.insert("_id".to_string(), json!({ "type": "string" }));
        }
    }

    out
}

/// Resolves `$ref` pointers in `schema` against a sibling `definitions`
/// table, recursively. Unresolvable references are left in place.
///
/// This runs outside the hot validation path (documentation and example
/// rendering); the definitions table is expected to be acyclic.
pub fn resolve_refs(schema: &Value, definitions: &Map<String, Value>) -> Value {
    match SchemaNode::classify(schema) {
        SchemaNode::Ref(reference) => {
            let name = reference.strip_prefix("#/definitions/").unwrap_or(reference);
            match definitions.get(name) {
                Some(resolved) => resolve_refs(resolved, definitions),
                None => schema.clone(),
            }
        }
        SchemaNode::Array(items) => {
            let mut out = schema.clone();
            if let (Some(items), Some(target)) = (items, out.as_object_mut()) {
                target.insert("items".to_string(), resolve_refs(items, definitions));
            }
            out
        }
        SchemaNode::Object(properties) => {
            let mut out = schema.clone();
            if let (Some(properties), Some(target)) = (properties, out.as_object_mut()) {
                let resolved: Map<String, Value> = properties
                    .iter()
                    .map(|(key, prop)| (key.clone(), resolve_refs(prop, definitions)))
                    .collect();
                target.insert("properties".to_string(), Value::Object(resolved));
            }
            out
        }
        SchemaNode::Simple(_) => schema.clone(),
    }
}

/// Synthesizes an example instance for `schema`, for callers rendering
/// documentation. References produce an empty object; resolve them first
/// with [`resolve_refs`] when a definitions table is available.
pub fn schema_example(schema: &Value) -> Value {
    match SchemaNode::classify(schema) {
        SchemaNode::Ref(_) => json!({}),
        SchemaNode::Array(items) => match items {
            Some(items) => json!([schema_example(items)]),
            None => json!([]),
        },
        SchemaNode::Object(properties) => {
            let example: Map<String, Value> = properties
                .into_iter()
                .flatten()
                .map(|(key, prop)| (key.clone(), schema_example(prop)))
                .collect();
            Value::Object(example)
        }
        SchemaNode::Simple(kind) => match kind {
            Some("string") => json!("string"),
            Some("number") => json!(1),
            Some("integer") => json!(1),
            Some("boolean") => json!(true),
            Some(other) => json!(other),
            None => Value::Null,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "tags": { "type": "array", "items": { "type": "string" } },
                "comments": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": { "text": { "type": "string" } },
                        "required": ["text"]
                    }
                }
            },
            "required": ["title", "comments"]
        })
    }

    #[test]
    fn classify_covers_all_shapes() {
        assert_eq!(
            SchemaNode::classify(&json!({ "$ref": "#/definitions/post" })),
            SchemaNode::Ref("#/definitions/post")
        );
        assert!(matches!(
            SchemaNode::classify(&json!({ "type": "array", "items": { "type": "string" } })),
            SchemaNode::Array(Some(_))
        ));
        assert!(matches!(
            SchemaNode::classify(&json!({ "type": "object", "properties": {} })),
            SchemaNode::Object(Some(_))
        ));
        assert_eq!(
            SchemaNode::classify(&json!({ "type": "string" })),
            SchemaNode::Simple(Some("string"))
        );
    }

    #[test]
    fn only_arrays_of_objects_are_sub_collections() {
        let schema = post_schema();
        assert_eq!(sub_collection_keys(&schema), vec!["comments"]);
        assert!(sub_schema(&schema, "comments").is_some());
        // arrays of scalars do not qualify
        assert!(sub_schema(&schema, "tags").is_none());
        assert!(sub_schema(&schema, "title").is_none());
        assert!(sub_schema(&schema, "missing").is_none());
    }

    #[test]
    fn projection_drops_sub_collections_and_their_required_entries() {
        let projected = project_schema(
            &post_schema(),
            SchemaProjection {
                without_sub_collections: true,
                ..Default::default()
            },
        );
        let properties = projected["properties"].as_object().unwrap();
        assert!(properties.contains_key("title"));
        assert!(!properties.contains_key("comments"));
        assert_eq!(projected["required"], json!(["title"]));
    }

    #[test]
    fn partial_projection_empties_required() {
        let projected = project_schema(
            &post_schema(),
            SchemaProjection {
                partial: true,
                ..Default::default()
            },
        );
        assert_eq!(projected["required"], json!([]));
    }

    #[test]
    fn with_id_projection_adds_the_id_property() {
        let projected = project_schema(
            &post_schema(),
            SchemaProjection {
                with_id: true,
                ..Default::default()
            },
        );
        assert_eq!(
            projected["properties"]["_id"],
            json!({ "type": "string" })
        );
    }

    #[test]
    fn refs_resolve_against_definitions() {
        let mut definitions = Map::new();
        definitions.insert(
            "comment".to_string(),
            json!({ "type": "object", "properties": { "text": { "type": "string" } } }),
        );
        let schema = json!({
            "type": "array",
            "items": { "$ref": "#/definitions/comment" }
        });
        let resolved = resolve_refs(&schema, &definitions);
        assert_eq!(resolved["items"]["type"], json!("object"));

        let dangling = json!({ "$ref": "#/definitions/missing" });
        assert_eq!(resolve_refs(&dangling, &definitions), dangling);
    }

    #[test]
    fn examples_follow_schema_shape() {
        let example = schema_example(&post_schema());
        assert_eq!(example["title"], json!("string"));
        assert_eq!(example["tags"], json!(["string"]));
        assert_eq!(example["comments"], json!([{ "text": "string" }]));
    }
}
