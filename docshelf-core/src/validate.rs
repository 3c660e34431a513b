//! Structural validation of schemas, payloads and collection metadata.
//!
//! Validation outcomes are ordinary values, never errors: a failed check
//! produces [`Validation::Invalid`] with an aggregated human-readable
//! message, which the surrounding layer maps to a protocol response. The
//! JSON-Schema dialect itself is handled by the `jsonschema` crate; this
//! module adds the store's own structural requirements on top (object-typed
//! top level, lowercase URL-safe collection names, well-formed access
//! rules). No coercion is performed anywhere — conformance is strict.

use std::sync::LazyLock;

use serde_json::{Value, json};

use crate::{
    meta::{AccessRule, CollectionMeta},
    schema::{SchemaProjection, project_schema},
};

/// Outcome of a validation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation<T> {
    /// The input conforms; carries the validated value.
    Valid(T),
    /// The input does not conform; carries the aggregated error message.
    Invalid(String),
}

impl<T> Validation<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    /// The validated value, discarding any error message.
    pub fn ok(self) -> Option<T> {
        match self {
            Validation::Valid(value) => Some(value),
            Validation::Invalid(_) => None,
        }
    }

    /// Converts into a `Result`, with the error message on the `Err` side.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(message) => Err(message),
        }
    }

    fn and_then<U>(self, f: impl FnOnce(T) -> Validation<U>) -> Validation<U> {
        match self {
            Validation::Valid(value) => f(value),
            Validation::Invalid(message) => Validation::Invalid(message),
        }
    }
}

/// Checks that `candidate` is usable as a collection schema: a JSON object
/// with top-level `type: "object"` and a `properties` key, structurally
/// valid against the JSON-Schema meta-schema.
pub fn validate_schema(candidate: &Value) -> Validation<Value> {
    let Some(schema) = candidate.as_object() else {
        return Validation::Invalid("schema must be an object".to_string());
    };

    if schema.get("type").and_then(Value::as_str) != Some("object")
        || !schema.contains_key("properties")
    {
        return Validation::Invalid(
            r#"schema must have type "object" and have a "properties" key"#.to_string(),
        );
    }

    match jsonschema::meta::validate(candidate) {
        Ok(()) => Validation::Valid(candidate.clone()),
        Err(err) => Validation::Invalid(err.to_string()),
    }
}

/// Validates `data` against `schema`. When `partial`, required-field
/// enforcement is suppressed by validating against a copy of the schema
/// with an empty `required` list.
pub fn validate_by_schema(schema: &Value, data: &Value, partial: bool) -> Validation<Value> {
    let relaxed;
    let schema = if partial && schema.get("required").is_some() {
        relaxed = project_schema(
            schema,
            SchemaProjection {
                partial: true,
                ..Default::default()
            },
        );
        &relaxed
    } else {
        schema
    };

    let validator = match jsonschema::validator_for(schema) {
        Ok(validator) => validator,
        Err(err) => return Validation::Invalid(err.to_string()),
    };

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|err| err.to_string())
        .collect();
    if errors.is_empty() {
        Validation::Valid(data.clone())
    } else {
        Validation::Invalid(errors.join(", "))
    }
}

fn is_url_safe(name: &str) -> bool {
    // the characters percent-encoding of a URI component leaves untouched
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
        })
}

/// Collection names must be lowercase, non-empty URL-safe strings so they
/// can appear verbatim in paths and storage keys.
pub fn validate_collection_name(name: &Value) -> Validation<String> {
    match name.as_str() {
        Some(name) if is_url_safe(name) && name == name.to_lowercase() => {
            Validation::Valid(name.to_string())
        }
        _ => Validation::Invalid("collection name must be a lowercase uri component".to_string()),
    }
}

static ACCESS_RULE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "properties": {
            "key": { "type": "string" },
            "description": { "type": "string" },
            "get": { "type": "boolean" },
            "post": { "type": "boolean" },
            "patch": { "type": "boolean" },
            "put": { "type": "boolean" },
            "delete": { "type": "boolean" }
        },
        "required": ["key"]
    })
});

/// Validates a single access rule.
pub fn validate_access_rule(data: &Value) -> Validation<AccessRule> {
    validate_by_schema(&ACCESS_RULE_SCHEMA, data, false).and_then(|value| {
        match serde_json::from_value(value) {
            Ok(rule) => Validation::Valid(rule),
            Err(err) => Validation::Invalid(err.to_string()),
        }
    })
}

/// Validates a whole access list.
pub fn validate_access_rules(data: &Value) -> Validation<Vec<AccessRule>> {
    let list_schema = json!({ "type": "array", "items": ACCESS_RULE_SCHEMA.clone() });
    validate_by_schema(&list_schema, data, false).and_then(|value| {
        match serde_json::from_value(value) {
            Ok(rules) => Validation::Valid(rules),
            Err(err) => Validation::Invalid(err.to_string()),
        }
    })
}

/// Validates a full collection registration payload: name, schema and
/// (optional) access list, in that order, failing on the first problem.
pub fn validate_collection(data: &Value) -> Validation<CollectionMeta> {
    let Some(record) = data.as_object() else {
        return Validation::Invalid("collection metadata must be an object".to_string());
    };

    let name = match validate_collection_name(record.get("name").unwrap_or(&Value::Null)) {
        Validation::Valid(name) => name,
        Validation::Invalid(message) => return Validation::Invalid(message),
    };

    let schema = match validate_schema(record.get("schema").unwrap_or(&Value::Null)) {
        Validation::Valid(schema) => schema,
        Validation::Invalid(message) => return Validation::Invalid(message),
    };

    let access_value = match record.get("access") {
        None | Some(Value::Null) => json!([]),
        Some(value) => value.clone(),
    };
    let access = match validate_access_rules(&access_value) {
        Validation::Valid(access) => access,
        Validation::Invalid(message) => return Validation::Invalid(message),
    };

    Validation::Valid(CollectionMeta {
        name,
        schema,
        access,
    })
}
