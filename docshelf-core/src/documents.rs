//! Document and sub-document storage.
//!
//! Documents are flat JSON objects persisted at `(collection, id)`; their
//! schema-declared sub-collections are persisted one element at a time at
//! `(collection, id, key, sub_id)`. A stored record never contains its own
//! id — every read path reconstructs `_id` from the storage key.
//!
//! Ids are ULIDs: 26 characters, lexicographically time-sortable, so
//! listing in key order is creation order without extra sorting.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::debug;
use ulid::{Generator, Ulid};

use crate::{
    error::StoreResult,
    kv::{self, KeyValueStore},
    meta::CollectionMeta,
    schema,
};

/// The top-level fields of a document or sub-document.
pub type Fields = Map<String, Value>;

/// The reserved field carrying a document's id on the way out.
pub const ID_FIELD: &str = "_id";

/// Options for [`DocumentStore::insert`].
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    /// Persist under this id instead of generating a fresh one.
    pub id: Option<String>,
    /// Persist only the top-level fields, leaving sub-collection keys
    /// untouched in storage.
    pub skip_sub_collections: bool,
}

fn with_id(id: &str, fields: &Fields) -> Fields {
    let mut out = fields.clone();
    out.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    out
}

/// Document CRUD over a key-value handle.
///
/// Multi-key sequences here (insert with sub-collection expansion,
/// cascading delete) are composed of independent atomic steps with no
/// isolation between them; a concurrent reader may observe partial state.
pub struct DocumentStore<K: KeyValueStore> {
    kv: K,
    /// Monotonic id source: ids minted in the same millisecond still
    /// increase, so key order stays creation order.
    ids: Mutex<Generator>,
}

impl<K: KeyValueStore> fmt::Debug for DocumentStore<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("kv", &self.kv)
            .finish_non_exhaustive()
    }
}

impl<K: KeyValueStore> DocumentStore<K> {
    /// Creates a document store bound to the given storage handle.
    pub fn new(kv: K) -> Self {
        Self {
            kv,
            ids: Mutex::new(Generator::new()),
        }
    }

    fn new_id(&self) -> String {
        let mut ids = self.ids.lock().unwrap_or_else(PoisonError::into_inner);
        // the generator only fails when the random component overflows
        // within one millisecond; a fresh ulid keeps the id unique at the
        // cost of ordering for that one id
        ids.generate().unwrap_or_else(|_| Ulid::new()).to_string()
    }

    /// Inserts a document, generating a fresh id when none is supplied.
    ///
    /// Fields named by the schema's sub-collection keys are split off the
    /// top-level record. Unless `skip_sub_collections`, each element of an
    /// array-valued sub-collection field is persisted as its own
    /// sub-document under a fresh id, and the returned document carries
    /// every declared sub-collection key with the persisted entries (an
    /// empty array when the payload had none).
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) when the
    /// underlying engine fails; earlier writes of the sequence are not
    /// rolled back.
    pub async fn insert(
        &self,
        meta: &CollectionMeta,
        data: &Fields,
        options: InsertOptions,
    ) -> StoreResult<Fields> {
        let id = options.id.unwrap_or_else(|| self.new_id());
        let sub_keys = schema::sub_collection_keys(&meta.schema);

        let top: Fields = data
            .iter()
            .filter(|(key, _)| !sub_keys.iter().any(|sub| sub == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.kv
            .set(&kv::doc_key(&meta.name, &id), Value::Object(top.clone()))
            .await?;

        let mut result = with_id(&id, &top);
        if !options.skip_sub_collections {
            for key in &sub_keys {
                let items = data
                    .get(key)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    let sub_id = self.new_id();
                    self.kv
                        .set(&kv::sub_doc_key(&meta.name, &id, key, &sub_id), item.clone())
                        .await?;
                    values.push(match item {
                        Value::Object(fields) => Value::Object(with_id(&sub_id, &fields)),
                        other => other,
                    });
                }
                result.insert(key.clone(), Value::Array(values));
            }
        }

        debug!(collection = %meta.name, id = %id, "inserted document");
        Ok(result)
    }

    /// Fetches a document by id, or `None` when absent. The returned
    /// `_id` comes from the key, never from the stored record.
    pub async fn get(&self, name: &str, id: &str) -> StoreResult<Option<Fields>> {
        match self.kv.get(&kv::doc_key(name, id)).await? {
            Some(Value::Object(fields)) => Ok(Some(with_id(id, &fields))),
            _ => Ok(None),
        }
    }

    /// Rewrites a document: `data` verbatim when `replace`, otherwise a
    /// shallow merge where `data` fields override the current ones and
    /// everything else is retained. Sub-collections are never re-expanded
    /// here; they are mutated only through their own operations. Returns
    /// `None` when the document does not exist.
    ///
    /// Read-modify-write with no version check (last write wins).
    pub async fn update(
        &self,
        meta: &CollectionMeta,
        id: &str,
        data: &Fields,
        replace: bool,
    ) -> StoreResult<Option<Fields>> {
        let Some(mut current) = self.get(&meta.name, id).await? else {
            return Ok(None);
        };
        current.remove(ID_FIELD);

        let to_save = if replace {
            data.clone()
        } else {
            let mut merged = current;
            merged.extend(data.iter().map(|(key, value)| (key.clone(), value.clone())));
            merged
        };

        let saved = self
            .insert(
                meta,
                &to_save,
                InsertOptions {
                    id: Some(id.to_string()),
                    skip_sub_collections: true,
                },
            )
            .await?;
        Ok(Some(saved))
    }

    /// Deletes the document and all of its sub-documents: every key under
    /// the `(collection, id)` prefix, one at a time, then the document key
    /// itself. No atomicity across the sequence.
    pub async fn delete(&self, name: &str, id: &str) -> StoreResult<()> {
        let doc_key = kv::doc_key(name, id);
        for (key, _) in self.kv.list(&doc_key).await? {
            self.kv.delete(&key).await?;
        }
        self.kv.delete(&doc_key).await?;
        debug!(collection = name, id = id, "deleted document");
        Ok(())
    }

    /// All documents of a collection, ascending by id. Ids are
    /// time-sortable, so this is creation order.
    pub async fn list(&self, name: &str) -> StoreResult<Vec<Fields>> {
        self.list_filtered(name, |_, _| true).await
    }

    /// Like [`list`](Self::list) with a `(fields, index) -> bool`
    /// predicate. The index counts every key scanned under the collection
    /// prefix, sub-documents included; only direct documents (key depth 3)
    /// appear in the result.
    pub async fn list_filtered<F>(&self, name: &str, filter: F) -> StoreResult<Vec<Fields>>
    where
        F: Fn(&Fields, usize) -> bool,
    {
        let prefix = vec![kv::DOC_PREFIX.to_string(), name.to_string()];
        let mut result = Vec::new();
        for (i, (key, value)) in self.kv.list(&prefix).await?.into_iter().enumerate() {
            if key.len() != 3 {
                continue;
            }
            let Value::Object(fields) = value else {
                continue;
            };
            if filter(&fields, i) {
                result.push(with_id(&key[2], &fields));
            }
        }
        Ok(result)
    }

    /// Fetches one sub-document. `None` when `key` is not a declared
    /// sub-collection or the record is absent. The returned `_id` is the
    /// sub-document's own id, taken from the key.
    pub async fn get_sub(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
        sub_id: &str,
    ) -> StoreResult<Option<Fields>> {
        if !is_sub_collection(meta, key) {
            return Ok(None);
        }
        match self
            .kv
            .get(&kv::sub_doc_key(&meta.name, id, key, sub_id))
            .await?
        {
            Some(Value::Object(fields)) => Ok(Some(with_id(sub_id, &fields))),
            _ => Ok(None),
        }
    }

    /// Persists one sub-document under `(id, key)` with a fresh id and
    /// returns it. `None` when `key` is not a declared sub-collection.
    pub async fn add_sub(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
        data: &Fields,
    ) -> StoreResult<Option<Fields>> {
        if !is_sub_collection(meta, key) {
            return Ok(None);
        }
        let sub_id = self.new_id();
        self.kv
            .set(
                &kv::sub_doc_key(&meta.name, id, key, &sub_id),
                Value::Object(data.clone()),
            )
            .await?;
        Ok(Some(with_id(&sub_id, data)))
    }

    /// Rewrites one sub-document, merging or replacing like
    /// [`update`](Self::update). `None` when `key` is undeclared or the
    /// sub-document is absent.
    pub async fn set_sub(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
        sub_id: &str,
        data: &Fields,
        replace: bool,
    ) -> StoreResult<Option<Fields>> {
        let Some(mut current) = self.get_sub(meta, id, key, sub_id).await? else {
            return Ok(None);
        };
        current.remove(ID_FIELD);

        let to_save = if replace {
            data.clone()
        } else {
            let mut merged = current;
            merged.extend(data.iter().map(|(k, value)| (k.clone(), value.clone())));
            merged
        };

        self.kv
            .set(
                &kv::sub_doc_key(&meta.name, id, key, sub_id),
                Value::Object(to_save.clone()),
            )
            .await?;
        Ok(Some(with_id(sub_id, &to_save)))
    }

    /// Deletes one sub-document. Returns `false` (deleting nothing) when
    /// `key` is not a declared sub-collection.
    pub async fn delete_sub(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
        sub_id: &str,
    ) -> StoreResult<bool> {
        if !is_sub_collection(meta, key) {
            return Ok(false);
        }
        self.kv
            .delete(&kv::sub_doc_key(&meta.name, id, key, sub_id))
            .await?;
        Ok(true)
    }

    /// All sub-documents under `(id, key)`, ascending by sub id. `None`
    /// when `key` is not a declared sub-collection.
    pub async fn list_sub(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
    ) -> StoreResult<Option<Vec<Fields>>> {
        self.list_sub_filtered(meta, id, key, |_, _| true).await
    }

    /// Like [`list_sub`](Self::list_sub) with a `(fields, index) -> bool`
    /// predicate.
    pub async fn list_sub_filtered<F>(
        &self,
        meta: &CollectionMeta,
        id: &str,
        key: &str,
        filter: F,
    ) -> StoreResult<Option<Vec<Fields>>>
    where
        F: Fn(&Fields, usize) -> bool,
    {
        if !is_sub_collection(meta, key) {
            return Ok(None);
        }
        let prefix = vec![
            kv::DOC_PREFIX.to_string(),
            meta.name.clone(),
            id.to_string(),
            key.to_string(),
        ];
        let mut result = Vec::new();
        for (i, (key, value)) in self.kv.list(&prefix).await?.into_iter().enumerate() {
            if key.len() != 5 {
                continue;
            }
            let Value::Object(fields) = value else {
                continue;
            };
            if filter(&fields, i) {
                result.push(with_id(&key[4], &fields));
            }
        }
        Ok(Some(result))
    }
}

fn is_sub_collection(meta: &CollectionMeta, key: &str) -> bool {
    schema::sub_schema(&meta.schema, key).is_some()
}
