//! Atomic JSON file primitives.
//!
//! Writes build the new file contents as a `.tmp` sibling, fsync it, and
//! rename it over the target; the rename is the only step that makes a new
//! version visible, so readers never observe a partially written file. Reads
//! recover from corruption by truncating to the last valid JSON prefix,
//! falling back to the `.bak` sibling, or resetting to a caller-supplied
//! default -- never by propagating a parse failure.

use super::StoreError;
use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Sibling path used for in-flight writes.
pub fn tmp_path(path: &Path) -> PathBuf {
    append_suffix(path, ".tmp")
}

/// Sibling path holding the previous file version.
pub fn bak_path(path: &Path) -> PathBuf {
    append_suffix(path, ".bak")
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Atomically replace `path` with the pretty-printed JSON for `data`.
///
/// The previous contents (if any) are copied to the `.bak` sibling before the
/// rename, best-effort. A failure at any point before the rename leaves the
/// old file intact and removes the temp file.
pub fn write_json_atomic(path: &Path, data: &Value) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }
    }

    let body = serde_json::to_vec_pretty(data).map_err(|e| StoreError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    if path.exists() {
        if let Err(e) = fs::copy(path, bak_path(path)) {
            warn!(path = %path.display(), error = %e, "Failed to write backup sibling");
        }
    }

    let tmp = tmp_path(path);
    let write_result = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        Ok(())
    })();

    match write_result {
        Ok(()) => fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            io_err(path, e)
        }),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(io_err(&tmp, e))
        }
    }
}

/// Read and parse a JSON file. `Ok(None)` when the file does not exist.
pub fn read_json(path: &Path) -> Result<Option<Value>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_err(path, e)),
    };
    serde_json::from_slice(&bytes).map(Some).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Scan backward for the longest prefix that parses as complete JSON.
///
/// Catches trailing garbage after a valid document (interrupted rewrite of a
/// shrinking file, editor droppings). A file truncated mid-document has no
/// valid prefix and falls through to the backup path.
fn repair_prefix(bytes: &[u8]) -> Option<Value> {
    for (i, b) in bytes.iter().enumerate().rev() {
        if *b == b'}' || *b == b']' {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes[..=i]) {
                return Some(value);
            }
        }
    }
    None
}

/// Read `path`, recovering from corruption instead of failing.
///
/// Recovery order: truncate to the last valid JSON prefix, restore the `.bak`
/// sibling, reset to `default`. Each step logs a warning; a recovered value is
/// written back so subsequent reads are clean.
pub fn read_json_or_recover(path: &Path, default: &Value) -> Value {
    match read_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => default.clone(),
        Err(StoreError::Corrupt { .. }) => recover(path, default),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Read failed, using default");
            default.clone()
        }
    }
}

fn recover(path: &Path, default: &Value) -> Value {
    warn!(path = %path.display(), "Corrupted JSON detected, attempting recovery");

    if let Ok(bytes) = fs::read(path) {
        if let Some(value) = repair_prefix(&bytes) {
            warn!(path = %path.display(), "Repaired by truncating to last valid JSON prefix");
            persist_recovered(path, &value);
            return value;
        }
    }

    match read_json(&bak_path(path)) {
        Ok(Some(value)) => {
            warn!(path = %path.display(), "Restored contents from backup sibling");
            persist_recovered(path, &value);
            value
        }
        _ => {
            warn!(path = %path.display(), "Recovery failed, resetting to default");
            persist_recovered(path, default);
            default.clone()
        }
    }
}

fn persist_recovered(path: &Path, value: &Value) {
    if let Err(e) = write_json_atomic(path, value) {
        warn!(path = %path.display(), error = %e, "Failed to persist recovered contents");
    }
}
