//! Ordered key-value contract the store is built on.
//!
//! Everything the store persists lives in a single ordered key space. A key
//! is a tuple of string segments compared lexicographically segment by
//! segment, and the whole layout is three shapes deep:
//!
//! - `("collection-meta", name)` — collection metadata
//! - `("collection", name, doc_id)` — a document's top-level fields
//! - `("collection", name, doc_id, sub_key, sub_id)` — one sub-document
//!
//! The engine behind [`KeyValueStore`] is an external dependency. It must
//! guarantee atomicity per single-key operation and ascending key order for
//! prefix scans; it is not expected to provide multi-key atomicity, and the
//! store core never assumes any.
//!
//! # Traits
//!
//! - [`KeyValueStore`]: the engine contract
//! - [`KeyValueStoreBuilder`]: factory trait for constructing engine handles

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::StoreResult;

/// A storage key: a tuple of string segments.
pub type Key = Vec<String>;

/// First segment of collection metadata keys.
pub const META_PREFIX: &str = "collection-meta";

/// First segment of document and sub-document keys.
pub const DOC_PREFIX: &str = "collection";

/// Builds the metadata key `("collection-meta", name)`.
pub fn meta_key(name: &str) -> Key {
    vec![META_PREFIX.to_string(), name.to_string()]
}

/// Builds the document key `("collection", name, id)`.
pub fn doc_key(name: &str, id: &str) -> Key {
    vec![DOC_PREFIX.to_string(), name.to_string(), id.to_string()]
}

/// Builds the sub-document key `("collection", name, id, sub_key, sub_id)`.
pub fn sub_doc_key(name: &str, id: &str, sub_key: &str, sub_id: &str) -> Key {
    vec![
        DOC_PREFIX.to_string(),
        name.to_string(),
        id.to_string(),
        sub_key.to_string(),
        sub_id.to_string(),
    ]
}

/// Abstract interface for the ordered key-value engine.
///
/// Implementations must be thread-safe and support concurrent access from
/// multiple async tasks. Each method is a single atomic step against the
/// engine; sequences of calls carry no isolation, which the layers above
/// document where it matters.
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Fetches the value stored at `key`, or `None` when absent.
    async fn get(&self, key: &[String]) -> StoreResult<Option<Value>>;

    /// Stores `value` at `key`, overwriting any existing value (idempotent
    /// upsert).
    async fn set(&self, key: &[String], value: Value) -> StoreResult<()>;

    /// Removes the value at `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &[String]) -> StoreResult<()>;

    /// Returns every entry whose key is strictly longer than `prefix` and
    /// starts with it (segment-wise), in ascending key order. An entry
    /// stored at exactly `prefix` is not part of the result.
    async fn list(&self, prefix: &[String]) -> StoreResult<Vec<(Key, Value)>>;
}

#[async_trait]
impl<K> KeyValueStore for &K
where
    K: KeyValueStore,
{
    async fn get(&self, key: &[String]) -> StoreResult<Option<Value>> {
        (*self).get(key).await
    }

    async fn set(&self, key: &[String], value: Value) -> StoreResult<()> {
        (*self).set(key, value).await
    }

    async fn delete(&self, key: &[String]) -> StoreResult<()> {
        (*self).delete(key).await
    }

    async fn list(&self, prefix: &[String]) -> StoreResult<Vec<(Key, Value)>> {
        (*self).list(prefix).await
    }
}

/// Factory trait for constructing engine handles.
///
/// A handle is built once at startup and injected into the registry and
/// document store; it is never recreated per call.
#[async_trait]
pub trait KeyValueStoreBuilder {
    type Store: KeyValueStore;

    async fn build(self) -> StoreResult<Self::Store>;
}
