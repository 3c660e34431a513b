//! Collection metadata registry.
//!
//! CRUD over [`CollectionMeta`] records, bound to an injected key-value
//! handle. The registry persists mechanics only: name uniqueness and
//! duplicate-name policy belong to the caller, which is why [`create`]
//! silently overwrites.
//!
//! [`create`]: CollectionRegistry::create

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::StoreResult,
    kv::{self, KeyValueStore},
    meta::{AccessRule, CollectionMeta},
};

/// On-disk shape of a metadata record. The collection name lives in the
/// key, never in the value; reads reconstruct it.
#[derive(Debug, Serialize, Deserialize)]
struct MetaRecord {
    schema: Value,
    #[serde(default)]
    access: Vec<AccessRule>,
}

/// CRUD for collection metadata over a key-value handle.
#[derive(Debug)]
pub struct CollectionRegistry<K: KeyValueStore> {
    kv: K,
}

impl<K: KeyValueStore> CollectionRegistry<K> {
    /// Creates a registry bound to the given storage handle.
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Persists metadata for `name`, silently overwriting any existing
    /// entry with the same name.
    pub async fn create(
        &self,
        name: &str,
        schema: Value,
        access: Vec<AccessRule>,
    ) -> StoreResult<()> {
        let record = serde_json::to_value(MetaRecord { schema, access })?;
        self.kv.set(&kv::meta_key(name), record).await
    }

    /// Fetches the metadata for `name`, or `None` when unregistered.
    pub async fn get(&self, name: &str) -> StoreResult<Option<CollectionMeta>> {
        match self.kv.get(&kv::meta_key(name)).await? {
            Some(value) => {
                let record: MetaRecord = serde_json::from_value(value)?;
                Ok(Some(CollectionMeta {
                    name: name.to_string(),
                    schema: record.schema,
                    access: record.access,
                }))
            }
            None => Ok(None),
        }
    }

    /// All registered collections, in storage key order (ascending by
    /// name).
    pub async fn list(&self) -> StoreResult<Vec<CollectionMeta>> {
        let prefix = vec![kv::META_PREFIX.to_string()];
        let mut result = Vec::new();
        for (key, value) in self.kv.list(&prefix).await? {
            let record: MetaRecord = serde_json::from_value(value)?;
            result.push(CollectionMeta {
                name: key.get(1).cloned().unwrap_or_default(),
                schema: record.schema,
                access: record.access,
            });
        }
        Ok(result)
    }

    /// Deletes the collection: every document and sub-document under its
    /// prefix, then the metadata record itself.
    ///
    /// The scan-then-delete sequence is not atomic; a concurrent reader
    /// may observe a partially deleted collection.
    pub async fn delete(&self, name: &str) -> StoreResult<()> {
        let prefix = vec![kv::DOC_PREFIX.to_string(), name.to_string()];
        for (key, _) in self.kv.list(&prefix).await? {
            self.kv.delete(&key).await?;
        }
        debug!(collection = name, "deleted collection");
        self.kv.delete(&kv::meta_key(name)).await
    }

    /// Removes any existing rule with the same key, appends `rule` and
    /// persists. Returns `false` when the collection does not exist.
    ///
    /// Read-modify-write with no version check: concurrent access
    /// mutations on the same collection are last-write-wins.
    pub async fn add_access(&self, name: &str, rule: AccessRule) -> StoreResult<bool> {
        let Some(meta) = self.get(name).await? else {
            return Ok(false);
        };
        let mut access: Vec<AccessRule> = meta
            .access
            .into_iter()
            .filter(|existing| existing.key != rule.key)
            .collect();
        debug!(collection = name, key = %rule.key, "adding access rule");
        access.push(rule);
        self.create(name, meta.schema, access).await?;
        Ok(true)
    }

    /// Filters out every rule matching `key` and persists. Removing an
    /// absent key is not an error. Returns `false` when the collection
    /// does not exist.
    pub async fn remove_access(&self, name: &str, key: &str) -> StoreResult<bool> {
        let Some(meta) = self.get(name).await? else {
            return Ok(false);
        };
        let access = meta
            .access
            .into_iter()
            .filter(|existing| existing.key != key)
            .collect();
        self.create(name, meta.schema, access).await?;
        Ok(true)
    }
}
