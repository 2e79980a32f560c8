//! Integration tests for the JSON file store layer.
//!
//! These tests exercise the collection and singleton stores against real
//! files in a temp directory, including crash-recovery and concurrency.

use serde::{Deserialize, Serialize};
use taskkeeper::store::{JsonFileStore, Keyed, SingletonStore, StoreError};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: String,
    label: String,
}

impl Item {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

impl Keyed for Item {
    fn key(&self) -> &str {
        &self.id
    }
}

fn setup_store(temp: &TempDir) -> JsonFileStore<Item> {
    JsonFileStore::open(temp.path().join("items.json"), "items")
        .expect("Failed to open item store")
}

mod collection_tests {
    use super::*;

    #[test]
    fn open_creates_file_with_empty_collection() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);

        assert_eq!(store.count(), 0);
        let content = std::fs::read_to_string(temp.path().join("items.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["items"], serde_json::json!([]));
    }

    #[test]
    fn add_get_update_remove_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);

        store.add(&Item::new("a", "first")).unwrap();
        store.add(&Item::new("b", "second")).unwrap();
        assert_eq!(store.count(), 2);
        assert_eq!(store.get("a").unwrap().label, "first");

        store.update(&Item::new("a", "renamed")).unwrap();
        assert_eq!(store.get("a").unwrap().label, "renamed");

        assert!(store.remove("a").unwrap());
        assert!(store.get("a").is_none());
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn add_rejects_duplicate_key() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);
        store.add(&Item::new("a", "first")).unwrap();

        let result = store.add(&Item::new("a", "again"));

        assert!(matches!(result, Err(StoreError::DuplicateKey(ref k)) if k == "a"));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn update_of_unknown_key_fails() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);

        let result = store.update(&Item::new("ghost", "x"));

        assert!(matches!(result, Err(StoreError::KeyNotFound(ref k)) if k == "ghost"));
    }

    #[test]
    fn remove_of_unknown_key_returns_false() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);

        assert!(!store.remove("ghost").unwrap());
    }

    #[test]
    fn items_survive_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let store = setup_store(&temp);
            store.add(&Item::new("a", "persisted")).unwrap();
        }

        let store = setup_store(&temp);
        assert_eq!(store.get("a").unwrap().label, "persisted");
    }

    #[test]
    fn all_preserves_insertion_order() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);
        for id in ["c", "a", "b"] {
            store.add(&Item::new(id, id)).unwrap();
        }

        let ids: Vec<String> = store.all().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn clear_empties_the_collection() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);
        store.add(&Item::new("a", "x")).unwrap();
        store.add(&Item::new("b", "y")).unwrap();

        store.clear().unwrap();

        assert_eq!(store.count(), 0);
    }
}

mod recovery_tests {
    use super::*;

    #[test]
    fn trailing_garbage_is_repaired() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.json");
        {
            let store = setup_store(&temp);
            store.add(&Item::new("a", "kept")).unwrap();
        }

        // Simulate a partial second write appended after a complete document.
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("{\"items\": [{\"id\":");
        std::fs::write(&path, content).unwrap();

        let store = setup_store(&temp);
        assert_eq!(store.get("a").unwrap().label, "kept");
    }

    #[test]
    fn corrupt_file_falls_back_to_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.json");
        {
            let store = setup_store(&temp);
            store.add(&Item::new("a", "old")).unwrap();
            // Second write snapshots the previous state into items.json.bak.
            store.add(&Item::new("b", "new")).unwrap();
        }

        std::fs::write(&path, "not json at all").unwrap();

        let store = setup_store(&temp);
        let ids: Vec<String> = store.all().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn corrupt_file_without_backup_resets_to_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.json");
        {
            let store = setup_store(&temp);
            store.add(&Item::new("a", "lost")).unwrap();
            store.add(&Item::new("b", "lost too")).unwrap();
        }

        std::fs::write(&path, "not json at all").unwrap();
        std::fs::remove_file(temp.path().join("items.json.bak")).unwrap();

        let store = setup_store(&temp);
        assert_eq!(store.count(), 0);
        // The recovered state is persisted, so the file parses again.
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&content).is_ok());
    }

    #[test]
    fn unreadable_entries_are_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("items.json");
        std::fs::write(
            &path,
            r#"{"items": [{"id": "a", "label": "good"}, {"label": "missing id"}]}"#,
        )
        .unwrap();

        let store = setup_store(&temp);
        let items = store.all();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }
}

mod concurrency_tests {
    use super::*;

    #[test]
    fn concurrent_writers_never_tear_the_file() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);

        let mut handles = Vec::new();
        for worker in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for n in 0..25 {
                    let id = format!("w{}-{}", worker, n);
                    store.add(&Item::new(&id, "x")).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.count(), 100);

        // The file on disk is a single complete document.
        let content = std::fs::read_to_string(temp.path().join("items.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(doc["items"].as_array().unwrap().len(), 100);
    }

    #[test]
    fn concurrent_updates_leave_consistent_state() {
        let temp = TempDir::new().unwrap();
        let store = setup_store(&temp);
        store.add(&Item::new("shared", "0")).unwrap();

        let mut handles = Vec::new();
        for worker in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    store.update(&Item::new("shared", &worker.to_string())).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // One item remains, holding whichever write landed last.
        assert_eq!(store.count(), 1);
        let label = store.get("shared").unwrap().label;
        assert!(["0", "1", "2", "3"].contains(&label.as_str()));
    }
}

mod singleton_tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        volume: u8,
    }

    #[test]
    fn missing_value_yields_default() {
        let temp = TempDir::new().unwrap();
        let store: SingletonStore<Prefs> =
            SingletonStore::open(temp.path().join("prefs.json")).unwrap();

        assert_eq!(store.get(), Prefs::default());
    }

    #[test]
    fn set_then_get_round_trips_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.json");
        {
            let store: SingletonStore<Prefs> = SingletonStore::open(&path).unwrap();
            store.set(&Prefs { volume: 7 }).unwrap();
        }

        let store: SingletonStore<Prefs> = SingletonStore::open(&path).unwrap();
        assert_eq!(store.get().volume, 7);
    }

    #[test]
    fn unreadable_value_yields_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("prefs.json");
        std::fs::write(&path, r#"{"value": {"volume": "loud"}}"#).unwrap();

        let store: SingletonStore<Prefs> = SingletonStore::open(&path).unwrap();
        assert_eq!(store.get(), Prefs::default());
    }
}
