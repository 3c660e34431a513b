//! In-memory key-value backend for docshelf.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `KeyValueStore` trait. It keeps the whole key space in an ordered map
//! behind an async-aware read-write lock and is ideal for development,
//! testing, and small-scale deployments.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Ordered key space** - Prefix scans come back in ascending key order
//! - **Zero setup** - No external service, no persistence, no configuration
//!
//! # Quick Start
//!
//! ```ignore
//! use docshelf_memory::MemoryKv;
//! use docshelf_core::kv::KeyValueStore;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let kv = MemoryKv::new();
//!     let key = vec!["collection".to_string(), "posts".to_string(), "01A".to_string()];
//!
//!     kv.set(&key, json!({ "title": "Hello" })).await?;
//!     let entries = kv.list(&key[..2]).await?;
//!     assert_eq!(entries.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as docshelf_memory;

pub mod store;

pub use store::{MemoryKv, MemoryKvBuilder};
