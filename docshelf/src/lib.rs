//! Main docshelf crate providing a schema-driven JSON document store.
//!
//! This crate is the primary entry point for users of the docshelf project.
//! It re-exports the core modules and provides convenient access to the
//! in-memory storage backend.
//!
//! # Features
//!
//! - **Schema-driven collections** - Every collection carries a JSON Schema that
//!   validates and sanitizes its documents
//! - **Sub-collections** - Array-of-object schema properties become independently
//!   addressable sub-documents under their parent
//! - **Per-collection access rules** - Bearer-token rules with HTTP-style method
//!   flags, plus a process-wide super-user secret
//! - **Pluggable storage** - Any ordered key-value engine behind the
//!   `KeyValueStore` trait
//!
//! # Quick Start
//!
//! ```ignore
//! use docshelf::{memory::MemoryKv, registry::CollectionRegistry, documents::DocumentStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let kv = MemoryKv::new();
//!     let registry = CollectionRegistry::new(kv.clone());
//!     let docs = DocumentStore::new(kv);
//!
//!     registry
//!         .create(
//!             "posts",
//!             json!({
//!                 "type": "object",
//!                 "properties": { "title": { "type": "string" } },
//!                 "required": ["title"]
//!             }),
//!             Vec::new(),
//!         )
//!         .await?;
//!
//!     let meta = registry.get("posts").await?.unwrap();
//!     let data = json!({ "title": "Hello" }).as_object().cloned().unwrap();
//!     let saved = docs.insert(&meta, &data, Default::default()).await?;
//!     println!("inserted {}", saved["_id"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing

pub mod prelude;

pub use docshelf_core::{
    access, config, documents, error, kv, meta, registry, sanitize, schema, validate,
};

// Re-export serde_json for convenience
pub use serde_json;

/// In-memory storage backend implementations.
pub mod memory {
    pub use docshelf_memory::{MemoryKv, MemoryKvBuilder};
}
