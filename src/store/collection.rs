//! Generic collection store: a homogeneous JSON array persisted whole.

use super::atomic::{read_json_or_recover, write_json_atomic};
use super::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Items stored in a [`JsonFileStore`] expose a unique key.
pub trait Keyed {
    fn key(&self) -> &str;
}

struct StoreInner {
    path: PathBuf,
    collection_key: &'static str,
    /// Serializes every read-modify-write cycle on the backing file.
    lock: Mutex<()>,
}

/// Collection store backed by a single JSON file of shape
/// `{"<collection_key>": [ ... ]}`.
///
/// Cloning yields another handle to the same file and lock. Every operation
/// takes the lock for its whole read-modify-write cycle, so concurrent
/// writers from this process serialize and never tear the file.
pub struct JsonFileStore<T> {
    inner: Arc<StoreInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> JsonFileStore<T>
where
    T: Keyed + Clone + Serialize + DeserializeOwned,
{
    /// Open the store, creating the file with an empty collection if absent.
    pub fn open(path: impl Into<PathBuf>, collection_key: &'static str) -> Result<Self, StoreError> {
        let store = Self {
            inner: Arc::new(StoreInner {
                path: path.into(),
                collection_key,
                lock: Mutex::new(()),
            }),
            _marker: PhantomData,
        };
        {
            let _guard = store.inner.lock.lock().unwrap();
            if !store.inner.path.exists() {
                write_json_atomic(&store.inner.path, &store.empty_doc())?;
            }
        }
        Ok(store)
    }

    fn empty_doc(&self) -> Value {
        json!({ self.inner.collection_key: [] })
    }

    /// Read the file and parse its items. Entries that fail to deserialize
    /// are skipped with a warning; they disappear on the next persist.
    fn read_items(&self) -> Vec<T> {
        let doc = read_json_or_recover(&self.inner.path, &self.empty_doc());
        let raw = match doc.get(self.inner.collection_key) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let mut items = Vec::with_capacity(raw.len());
        for entry in raw {
            match serde_json::from_value::<T>(entry) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(
                        path = %self.inner.path.display(),
                        error = %e,
                        "Skipping unreadable item"
                    );
                }
            }
        }
        items
    }

    fn persist(&self, items: &[T]) -> Result<(), StoreError> {
        let serialized = serde_json::to_value(items).map_err(|e| StoreError::Serialize {
            path: self.inner.path.clone(),
            source: e,
        })?;
        let doc = json!({ self.inner.collection_key: serialized });
        write_json_atomic(&self.inner.path, &doc)
    }

    /// All items in file order.
    pub fn all(&self) -> Vec<T> {
        let _guard = self.inner.lock.lock().unwrap();
        self.read_items()
    }

    /// Look up a single item by key.
    pub fn get(&self, key: &str) -> Option<T> {
        let _guard = self.inner.lock.lock().unwrap();
        self.read_items().into_iter().find(|item| item.key() == key)
    }

    /// Append a new item. Fails with [`StoreError::DuplicateKey`] if an item
    /// with the same key exists.
    pub fn add(&self, item: &T) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock().unwrap();
        let mut items = self.read_items();
        if items.iter().any(|existing| existing.key() == item.key()) {
            return Err(StoreError::DuplicateKey(item.key().to_string()));
        }
        items.push(item.clone());
        self.persist(&items)
    }

    /// Replace the item with the same key in place. Fails with
    /// [`StoreError::KeyNotFound`] if no such item exists.
    pub fn update(&self, item: &T) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock().unwrap();
        let mut items = self.read_items();
        let slot = items
            .iter_mut()
            .find(|existing| existing.key() == item.key())
            .ok_or_else(|| StoreError::KeyNotFound(item.key().to_string()))?;
        *slot = item.clone();
        self.persist(&items)
    }

    /// Remove the item with the given key. Returns `false` (without writing)
    /// when the key is absent.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let _guard = self.inner.lock.lock().unwrap();
        let mut items = self.read_items();
        let before = items.len();
        items.retain(|item| item.key() != key);
        if items.len() == before {
            return Ok(false);
        }
        self.persist(&items)?;
        Ok(true)
    }

    /// Number of readable items.
    pub fn count(&self) -> usize {
        self.all().len()
    }

    /// Remove every item.
    pub fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock().unwrap();
        write_json_atomic(&self.inner.path, &self.empty_doc())
    }
}
