//! The schema-driven core of a multi-tenant JSON document store.
//!
//! This crate is the core of the docshelf project and provides:
//!
//! - **Key-value abstraction** ([`kv`]) - The tuple-key storage trait backends implement
//! - **Collection metadata** ([`meta`]) - Schemas, access rules and HTTP-style methods
//! - **Metadata registry** ([`registry`]) - CRUD for collection definitions
//! - **Document storage** ([`documents`]) - Document and sub-document CRUD
//! - **Authorization** ([`access`]) - Bearer-token and access-rule decisions
//! - **Validation** ([`validate`]) - JSON Schema validation of names, schemas and payloads
//! - **Sanitization** ([`sanitize`]) - Allow-list filtering of write payloads
//! - **Schema analysis** ([`schema`]) - Sub-collection detection, projection and examples
//! - **Configuration** ([`config`]) - Startup configuration for the core
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use docshelf_core::{documents::DocumentStore, registry::CollectionRegistry};
//! use docshelf_memory::MemoryKv;
//! use serde_json::json;
//!
//! let kv = MemoryKv::new();
//! let registry = CollectionRegistry::new(kv.clone());
//! registry
//!     .create(
//!         "posts",
//!         json!({
//!             "type": "object",
//!             "properties": { "title": { "type": "string" } },
//!             "required": ["title"]
//!         }),
//!         Vec::new(),
//!     )
//!     .await?;
//!
//! let meta = registry.get("posts").await?.unwrap();
//! let docs = DocumentStore::new(kv);
//! let saved = docs.insert(&meta, &data, Default::default()).await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as docshelf_core;

pub mod access;
pub mod config;
pub mod documents;
pub mod error;
pub mod kv;
pub mod meta;
pub mod registry;
pub mod sanitize;
pub mod schema;
pub mod validate;
