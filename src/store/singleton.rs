//! Singleton store: exactly one logical record per file.

use super::atomic::{read_json_or_recover, write_json_atomic};
use super::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

struct SingletonInner {
    path: PathBuf,
    lock: Mutex<()>,
}

/// Store for a single value, persisted as `{"value": {...} | null}`.
///
/// A missing file, a null value, or an unreadable value all yield the type's
/// default, so `get` never fails.
pub struct SingletonStore<T> {
    inner: Arc<SingletonInner>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for SingletonStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<T> SingletonStore<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Open the store, creating the file with a null value if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            inner: Arc::new(SingletonInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
            _marker: PhantomData,
        };
        {
            let _guard = store.inner.lock.lock().unwrap();
            if !store.inner.path.exists() {
                write_json_atomic(&store.inner.path, &json!({ "value": null }))?;
            }
        }
        Ok(store)
    }

    /// Read the stored value, falling back to the default.
    pub fn get(&self) -> T {
        let _guard = self.inner.lock.lock().unwrap();
        let doc = read_json_or_recover(&self.inner.path, &json!({ "value": null }));
        match doc.get("value") {
            Some(Value::Null) | None => T::default(),
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                warn!(
                    path = %self.inner.path.display(),
                    error = %e,
                    "Unreadable singleton value, using default"
                );
                T::default()
            }),
        }
    }

    /// Replace the stored value atomically.
    pub fn set(&self, value: &T) -> Result<(), StoreError> {
        let _guard = self.inner.lock.lock().unwrap();
        let serialized = serde_json::to_value(value).map_err(|e| StoreError::Serialize {
            path: self.inner.path.clone(),
            source: e,
        })?;
        write_json_atomic(&self.inner.path, &json!({ "value": serialized }))
    }
}
