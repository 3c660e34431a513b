//! Convenient re-exports of commonly used types from docshelf.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docshelf::prelude::*;
//! ```
//!
//! This provides access to:
//! - The key-value contract and key constructors
//! - Collection metadata, access rules and the registry
//! - Document storage and insert options
//! - Authorization, validation and sanitization entry points
//! - Error types

pub use docshelf_core::{
    access::{AccessControl, bearer_token},
    config::Config,
    documents::{DocumentStore, Fields, ID_FIELD, InsertOptions},
    error::{StoreError, StoreResult},
    kv::{Key, KeyValueStore, KeyValueStoreBuilder},
    meta::{AccessRule, CollectionMeta, Method, PUBLIC_KEY},
    registry::CollectionRegistry,
    sanitize::{sanitize_access_rule, sanitize_by_schema},
    validate::{Validation, validate_by_schema, validate_collection, validate_schema},
};
