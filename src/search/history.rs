use crate::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

pub const MAX_HISTORY_ENTRIES: usize = 5;

pub trait HistoryPersistence: Send + Sync {
    fn read(&self) -> Result<Vec<String>, HistoryError>;
    fn write(&self, entries: &[String]) -> Result<(), HistoryError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryDocument {
    entries: Vec<String>,
    updated_at: DateTime<Utc>,
}

/// Keeps history in a JSON file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryPersistence for JsonFileHistory {
    fn read(&self) -> Result<Vec<String>, HistoryError> {
        if !self.path.exists() {
            debug!("History file {:?} does not exist yet", self.path);
            return Ok(Vec::new());
        }
        let raw = fs::read(&self.path).map_err(|e| HistoryError::Storage(e.to_string()))?;
        let document: HistoryDocument = serde_json::from_slice(&raw)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        Ok(document.entries)
    }

    fn write(&self, entries: &[String]) -> Result<(), HistoryError> {
        let document = HistoryDocument {
            entries: entries.to_vec(),
            updated_at: Utc::now(),
        };
        let raw = serde_json::to_vec_pretty(&document)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| HistoryError::Storage(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw).map_err(|e| HistoryError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| HistoryError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl HistoryPersistence for MemoryHistory {
    fn read(&self) -> Result<Vec<String>, HistoryError> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .map_err(|e| HistoryError::Storage(e.to_string()))
    }

    fn write(&self, entries: &[String]) -> Result<(), HistoryError> {
        let mut stored = self
            .entries
            .lock()
            .map_err(|e| HistoryError::Storage(e.to_string()))?;
        *stored = entries.to_vec();
        Ok(())
    }
}

/// Most-recent-first list of distinct, non-blank queries.
///
/// Storage failures are logged and never surface to callers; the in-memory
/// list stays authoritative for the rest of the process.
pub struct HistoryStore {
    entries: Vec<String>,
    backend: Box<dyn HistoryPersistence>,
}

impl HistoryStore {
    pub fn load(backend: Box<dyn HistoryPersistence>) -> Self {
        let stored = match backend.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Discarding unreadable search history: {}", e);
                Vec::new()
            }
        };
        let entries = normalize(stored);
        debug!("Loaded {} history entries", entries.len());
        Self { entries, backend }
    }

    pub fn record(&mut self, query: &str) {
        if query.trim().is_empty() {
            return;
        }
        self.entries.retain(|entry| entry != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.persist();
    }

    pub fn list(&self) -> Vec<String> {
        self.entries.clone()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(e) = self.backend.write(&self.entries) {
            warn!("Failed to persist search history: {}", e);
        }
    }
}

fn normalize(stored: Vec<String>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::with_capacity(MAX_HISTORY_ENTRIES);
    for entry in stored {
        if entry.trim().is_empty() || entries.contains(&entry) {
            continue;
        }
        entries.push(entry);
        if entries.len() == MAX_HISTORY_ENTRIES {
            break;
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn memory_store() -> HistoryStore {
        HistoryStore::load(Box::<MemoryHistory>::default())
    }

    #[test]
    fn rerecording_moves_entry_to_front() {
        let mut store = memory_store();
        store.record("swift");
        store.record("uikit");
        assert_eq!(store.list(), vec!["uikit", "swift"]);

        store.record("swift");
        assert_eq!(store.list(), vec!["swift", "uikit"]);
    }

    #[test]
    fn blank_queries_are_ignored() {
        let mut store = memory_store();
        store.record("");
        store.record("   \t");
        assert!(store.list().is_empty());
    }

    #[test]
    fn list_is_bounded_and_distinct() {
        let mut store = memory_store();
        for query in ["a", "b", "c", "a", "d", "e", "f", "g", "b"] {
            store.record(query);
            let list = store.list();
            assert!(list.len() <= MAX_HISTORY_ENTRIES);
            assert_eq!(list[0], query);
            let mut distinct = list.clone();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), list.len());
        }
        assert_eq!(store.list(), vec!["b", "g", "f", "e", "d"]);
    }

    #[test]
    fn history_survives_reload_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut store = HistoryStore::load(Box::new(JsonFileHistory::new(&path)));
        store.record("mountains");
        store.record("sea");
        store.record("mountains");
        drop(store);

        let reloaded = HistoryStore::load(Box::new(JsonFileHistory::new(&path)));
        assert_eq!(reloaded.list(), vec!["mountains", "sea"]);
    }

    #[test]
    fn clear_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut store = HistoryStore::load(Box::new(JsonFileHistory::new(&path)));
        store.record("forest");
        store.clear();
        assert!(store.list().is_empty());

        let reloaded = HistoryStore::load(Box::new(JsonFileHistory::new(&path)));
        assert!(reloaded.list().is_empty());
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, b"not json").unwrap();

        let store = HistoryStore::load(Box::new(JsonFileHistory::new(&path)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn stored_list_is_normalized_on_load() {
        let backend = MemoryHistory::default();
        let stored: Vec<String> = ["x", "", "y", "x", "z", " ", "w", "v", "u"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        backend.write(&stored).unwrap();

        let store = HistoryStore::load(Box::new(backend));
        assert_eq!(store.list(), vec!["x", "y", "z", "w", "v"]);
    }
}
