//! JSON-file persistence layer.
//!
//! One file per entity type, rewritten whole on every mutation via the
//! temp-file-and-rename pattern in [`atomic`]. Collection files hold
//! `{"<key>": [ ... ]}`; the settings singleton holds `{"value": {...}}`.

pub mod atomic;
pub mod collection;
pub mod singleton;

pub use collection::{JsonFileStore, Keyed};
pub use singleton::SingletonStore;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the file storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize data for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("item with key '{0}' already exists")]
    DuplicateKey(String),

    #[error("item with key '{0}' not found")]
    KeyNotFound(String),
}
