//! In-memory storage implementation for the docshelf key-value trait.
//!
//! This module provides a simple in-memory engine that stores JSON values
//! in an ordered map behind an async-safe read-write lock. The ordered map
//! gives segment-wise lexicographic key order for free, which is exactly
//! the order prefix scans must surface.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;

use docshelf_core::{
    error::StoreResult,
    kv::{Key, KeyValueStore, KeyValueStoreBuilder},
};

type StoreMap = BTreeMap<Key, Value>;

/// Thread-safe in-memory key-value engine.
///
/// This struct implements the [`KeyValueStore`] trait over a
/// `BTreeMap<Key, Value>`, so iteration order matches tuple-key order and
/// every single-key operation is atomic under the lock.
///
/// # Thread Safety
///
/// `MemoryKv` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of
/// the same instance share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use docshelf_memory::MemoryKv;
/// use docshelf_core::kv::KeyValueStore;
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let kv = MemoryKv::new();
///     let key = vec!["collection".to_string(), "posts".to_string(), "01A".to_string()];
///
///     kv.set(&key, json!({ "title": "Hi" })).await?;
///     assert!(kv.get(&key).await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct MemoryKv {
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryKv {
    /// Creates a new empty in-memory engine.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing a `MemoryKv`.
    pub fn builder() -> MemoryKvBuilder {
        MemoryKvBuilder::default()
    }
}


#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &[String]) -> StoreResult<Option<Value>> {
        Ok(self.store.read().await.get(key).cloned())
    }

    async fn set(&self, key: &[String], value: Value) -> StoreResult<()> {
        self.store.write().await.insert(key.to_vec(), value);
        Ok(())
    }

    async fn delete(&self, key: &[String]) -> StoreResult<()> {
        // Deleting an absent key is not an error.
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &[String]) -> StoreResult<Vec<(Key, Value)>> {
        let store = self.store.read().await;
        Ok(store
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| key.len() > prefix.len())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// Builder for constructing [`MemoryKv`] instances.
///
/// Currently a no-op builder, kept so callers can construct any backend
/// through the same [`KeyValueStoreBuilder`] seam.
#[derive(Default)]
pub struct MemoryKvBuilder;

#[async_trait]
impl KeyValueStoreBuilder for MemoryKvBuilder {
    type Store = MemoryKv;

    /// Builds and returns a new [`MemoryKv`] instance. Always succeeds.
    async fn build(self) -> StoreResult<Self::Store> {
        Ok(MemoryKv::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(parts: &[&str]) -> Key {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[tokio::test]
    async fn get_set_delete_roundtrip() {
        let kv = MemoryKv::new();
        let k = key(&["collection", "posts", "01A"]);

        assert_eq!(kv.get(&k).await.unwrap(), None);
        kv.set(&k, json!({ "title": "Hi" })).await.unwrap();
        assert_eq!(kv.get(&k).await.unwrap(), Some(json!({ "title": "Hi" })));

        kv.delete(&k).await.unwrap();
        assert_eq!(kv.get(&k).await.unwrap(), None);
        // deleting again is a no-op
        kv.delete(&k).await.unwrap();
    }

    #[tokio::test]
    async fn set_overwrites_in_place() {
        let kv = MemoryKv::new();
        let k = key(&["collection", "posts", "01A"]);
        kv.set(&k, json!(1)).await.unwrap();
        kv.set(&k, json!(2)).await.unwrap();
        assert_eq!(kv.get(&k).await.unwrap(), Some(json!(2)));
        assert_eq!(kv.list(&key(&["collection", "posts"])).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_strict_prefix_in_key_order() {
        let kv = MemoryKv::new();
        kv.set(&key(&["collection", "posts", "01B"]), json!(2)).await.unwrap();
        kv.set(&key(&["collection", "posts", "01A"]), json!(1)).await.unwrap();
        kv.set(&key(&["collection", "posts", "01A", "comments", "01C"]), json!(3))
            .await
            .unwrap();
        kv.set(&key(&["collection", "users", "01D"]), json!(4)).await.unwrap();
        kv.set(&key(&["collection-meta", "posts"]), json!(5)).await.unwrap();

        let entries = kv.list(&key(&["collection", "posts"])).await.unwrap();
        let keys: Vec<Key> = entries.into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                key(&["collection", "posts", "01A"]),
                key(&["collection", "posts", "01A", "comments", "01C"]),
                key(&["collection", "posts", "01B"]),
            ]
        );
    }

    #[tokio::test]
    async fn prefix_match_is_per_segment_not_textual() {
        let kv = MemoryKv::new();
        kv.set(&key(&["collection", "posts", "01A"]), json!(1)).await.unwrap();
        kv.set(&key(&["collection", "postscript", "01B"]), json!(2))
            .await
            .unwrap();

        let entries = kv.list(&key(&["collection", "posts"])).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, key(&["collection", "posts", "01A"]));
    }

    #[tokio::test]
    async fn list_excludes_the_prefix_key_itself() {
        let kv = MemoryKv::new();
        let parent = key(&["collection", "posts", "01A"]);
        kv.set(&parent, json!(1)).await.unwrap();
        kv.set(&key(&["collection", "posts", "01A", "comments", "01B"]), json!(2))
            .await
            .unwrap();

        let entries = kv.list(&parent).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0.len(), 5);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let kv = MemoryKv::new();
        let clone = kv.clone();
        let k = key(&["collection", "posts", "01A"]);
        kv.set(&k, json!(1)).await.unwrap();
        assert_eq!(clone.get(&k).await.unwrap(), Some(json!(1)));
    }
}
