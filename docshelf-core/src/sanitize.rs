//! Allow-list sanitization of write payloads.
//!
//! Sanitization runs after validation and before persistence: whatever the
//! schema does not name is dropped, and access-rule fields are normalized
//! to their canonical types. Values that survive are passed through
//! untouched — this layer filters fields, it never coerces document data.

use serde_json::{Map, Value};

use crate::meta::AccessRule;

/// Returns a copy of `data` keeping only the keys present in
/// `schema.properties`. A schema without properties yields an empty
/// object. Allowed values are preserved exactly, including `0`, `false`
/// and `""`.
pub fn sanitize_by_schema(schema: &Value, data: &Map<String, Value>) -> Map<String, Value> {
    let Some(allowed) = schema.get("properties").and_then(Value::as_object) else {
        return Map::new();
    };
    data.iter()
        .filter(|(key, _)| allowed.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// String(value) semantics: strings pass through, everything else uses its
// JSON rendering.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalizes a loose access-rule object into an [`AccessRule`].
///
/// Known fields are allow-listed and everything else is dropped. Method
/// flags survive as `true` only for the literal boolean `true`; `key` and
/// `description` are string-coerced.
pub fn sanitize_access_rule(data: &Map<String, Value>) -> AccessRule {
    let flag = |name: &str| data.get(name) == Some(&Value::Bool(true));
    AccessRule {
        key: data.get("key").map(coerce_string).unwrap_or_default(),
        description: data.get("description").map(coerce_string),
        get: flag("get"),
        post: flag("post"),
        patch: flag("patch"),
        put: flag("put"),
        delete: flag("delete"),
    }
}
