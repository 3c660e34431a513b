//! Collection metadata: the schema a collection enforces and the access
//! rules that gate it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The access-rule key that matches every caller, credentialed or not.
pub const PUBLIC_KEY: &str = "public";

/// The HTTP-style methods an access rule can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    /// Parses a method name, case-insensitively. Unknown methods yield
    /// `None` and are denied by the authorization check.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "patch" => Some(Self::Patch),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// One entry of a collection's access list.
///
/// `key` is either the literal `"public"` or an opaque credential token.
/// Every method flag defaults to `false`: a rule grants exactly what it
/// names and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub get: bool,
    #[serde(default)]
    pub post: bool,
    #[serde(default)]
    pub patch: bool,
    #[serde(default)]
    pub put: bool,
    #[serde(default)]
    pub delete: bool,
}

impl AccessRule {
    /// Creates a rule for `key` that denies every method.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: None,
            get: false,
            post: false,
            patch: false,
            put: false,
            delete: false,
        }
    }

    /// Sets the flag for `method` to `true`.
    pub fn allow(mut self, method: Method) -> Self {
        match method {
            Method::Get => self.get = true,
            Method::Post => self.post = true,
            Method::Patch => self.patch = true,
            Method::Put => self.put = true,
            Method::Delete => self.delete = true,
        }
        self
    }

    /// Whether this rule grants `method`.
    pub fn allows(&self, method: Method) -> bool {
        match method {
            Method::Get => self.get,
            Method::Post => self.post,
            Method::Patch => self.patch,
            Method::Put => self.put,
            Method::Delete => self.delete,
        }
    }

    /// Whether this rule applies to a caller presenting `token`.
    pub fn matches(&self, token: Option<&str>) -> bool {
        self.key == PUBLIC_KEY || token.is_some_and(|t| t == self.key)
    }
}

/// Metadata for one registered collection.
///
/// `schema` is a JSON-Schema object whose top-level type is `"object"`. A
/// property of type array whose items are objects designates a
/// sub-collection named after that property (see [`crate::schema`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    pub name: String,
    pub schema: Value,
    #[serde(default)]
    pub access: Vec<AccessRule>,
}
