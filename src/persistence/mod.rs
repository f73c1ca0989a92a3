//! Persistence adapter: three independently stored blobs.
//!
//! Reads are synchronous and happen once at startup. Writes go through the
//! background [`PersistWriter`] and never report failure to the caller.

pub mod kv;
pub mod writer;

use crate::core::config::PersistenceConfig;
use crate::core::settings::{parse_settings, Settings};
use crate::lists::helpers::{default_lists, DEFAULT_LIST_ID};
use crate::lists::types::ListMap;
use kv::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use writer::PersistWriter;

pub const LISTS_KEY: &str = "shopping_lists";
pub const ACTIVE_LIST_KEY: &str = "current_list_id";
pub const SETTINGS_KEY: &str = "shopping_app_settings";

const ALL_KEYS: [&str; 3] = [LISTS_KEY, ACTIVE_LIST_KEY, SETTINGS_KEY];

/// Everything read back from storage, each part already defaulted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub lists: ListMap,
    pub active_list_id: String,
    pub settings: Settings,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            lists: default_lists(),
            active_list_id: DEFAULT_LIST_ID.to_string(),
            settings: Settings::default(),
        }
    }
}

/// The parts of a snapshot to write. Absent parts are left as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotPatch<'a> {
    pub lists: Option<&'a ListMap>,
    pub active_list_id: Option<&'a str>,
    pub settings: Option<&'a Settings>,
}

impl<'a> SnapshotPatch<'a> {
    pub fn lists(lists: &'a ListMap) -> Self {
        Self {
            lists: Some(lists),
            ..Default::default()
        }
    }

    pub fn active_list_id(id: &'a str) -> Self {
        Self {
            active_list_id: Some(id),
            ..Default::default()
        }
    }

    pub fn settings(settings: &'a Settings) -> Self {
        Self {
            settings: Some(settings),
            ..Default::default()
        }
    }

    pub fn with_active_list_id(mut self, id: &'a str) -> Self {
        self.active_list_id = Some(id);
        self
    }

    pub fn with_settings(mut self, settings: &'a Settings) -> Self {
        self.settings = Some(settings);
        self
    }
}

pub struct Persistence {
    kv: Arc<dyn KeyValueStore>,
    writer: PersistWriter,
}

impl Persistence {
    pub fn new(kv: Arc<dyn KeyValueStore>, config: PersistenceConfig) -> Self {
        let writer = PersistWriter::spawn(kv.clone(), config);
        Self { kv, writer }
    }

    /// Backed by a fresh [`MemoryStore`]; nothing outlives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), PersistenceConfig::default())
    }

    /// Read all three blobs. Each one that is missing or corrupt falls back to
    /// its own default without affecting the others.
    pub fn load(&self) -> Snapshot {
        let defaults = Snapshot::default();

        let lists = self
            .read_blob(LISTS_KEY, |raw| serde_json::from_str::<ListMap>(raw))
            .unwrap_or(defaults.lists);

        let active_list_id = self
            .read_blob(ACTIVE_LIST_KEY, |raw| {
                Ok::<_, std::convert::Infallible>(raw.trim().to_string())
            })
            .filter(|id| !id.is_empty())
            .unwrap_or(defaults.active_list_id);

        let settings = self
            .read_blob(SETTINGS_KEY, parse_settings)
            .unwrap_or(defaults.settings);

        tracing::info!(
            target: "persistence",
            lists = lists.len(),
            active_list_id = %active_list_id,
            "Snapshot loaded"
        );

        Snapshot {
            lists,
            active_list_id,
            settings,
        }
    }

    fn read_blob<T, E: std::fmt::Display>(
        &self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Option<T> {
        let raw = match self.kv.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(target: "persistence", key, "Entry not found, using default");
                return None;
            }
            Err(e) => {
                tracing::warn!(target: "persistence", key, "Failed to read entry, using default: {}", e);
                return None;
            }
        };

        match parse(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(target: "persistence", key, "Failed to parse entry, using default: {}", e);
                None
            }
        }
    }

    /// Queue writes for the provided parts. Failures are logged, never returned.
    pub fn save(&self, patch: SnapshotPatch<'_>) {
        if let Some(lists) = patch.lists {
            match serde_json::to_string(lists) {
                Ok(json) => self.writer.put(LISTS_KEY, json),
                Err(e) => tracing::error!(target: "persistence", "Failed to serialize lists: {}", e),
            }
        }

        if let Some(id) = patch.active_list_id {
            self.writer.put(ACTIVE_LIST_KEY, id.to_string());
        }

        if let Some(settings) = patch.settings {
            match serde_json::to_string(settings) {
                Ok(json) => self.writer.put(SETTINGS_KEY, json),
                Err(e) => tracing::error!(target: "persistence", "Failed to serialize settings: {}", e),
            }
        }
    }

    /// Remove every stored blob, discarding writes not yet flushed.
    pub fn clear(&self) {
        tracing::info!(target: "persistence", "Clearing stored data");
        self.writer.clear(&ALL_KEYS);
    }

    /// Block until all queued writes have reached the backend.
    pub fn flush(&self) {
        self.writer.flush();
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").field("kv", &self.kv).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::types::List;

    fn persistence_over(kv: Arc<MemoryStore>) -> Persistence {
        Persistence::new(kv, PersistenceConfig::default())
    }

    #[test]
    fn test_load_empty_store_gives_defaults() {
        let persistence = Persistence::in_memory();
        let snapshot = persistence.load();

        assert_eq!(snapshot.lists.len(), 1);
        assert_eq!(snapshot.active_list_id, DEFAULT_LIST_ID);
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_corrupt_settings_do_not_affect_lists() {
        let kv = Arc::new(MemoryStore::with_entries([
            (LISTS_KEY, r#"{"weekly": {"name": "Weekly", "items": []}}"#),
            (ACTIVE_LIST_KEY, "weekly"),
            (SETTINGS_KEY, "{not json"),
        ]));
        let snapshot = persistence_over(kv).load();

        assert_eq!(snapshot.lists.first().unwrap().name, "Weekly");
        assert_eq!(snapshot.active_list_id, "weekly");
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_corrupt_lists_do_not_affect_settings() {
        let kv = Arc::new(MemoryStore::with_entries([
            (LISTS_KEY, "[1, 2"),
            (SETTINGS_KEY, r#"{"darkMode": true}"#),
        ]));
        let snapshot = persistence_over(kv).load();

        assert_eq!(snapshot.lists.first().unwrap().id, DEFAULT_LIST_ID);
        assert!(snapshot.settings.dark_mode);
        assert!(snapshot.settings.show_completed);
    }

    #[test]
    fn test_save_writes_only_provided_parts() {
        let kv = Arc::new(MemoryStore::new());
        let persistence = persistence_over(kv.clone());

        let lists: ListMap = std::iter::once(List {
            id: "a".to_string(),
            name: "A".to_string(),
            items: Vec::new(),
            created_at: 0,
        })
        .collect();

        persistence.save(SnapshotPatch::lists(&lists).with_active_list_id("a"));
        persistence.flush();

        assert!(kv.get(LISTS_KEY).unwrap().is_some());
        assert_eq!(kv.get(ACTIVE_LIST_KEY).unwrap().as_deref(), Some("a"));
        assert!(kv.get(SETTINGS_KEY).unwrap().is_none());

        let reloaded = persistence.load();
        assert_eq!(reloaded.lists, lists);
    }

    #[test]
    fn test_clear_removes_all_blobs() {
        let kv = Arc::new(MemoryStore::with_entries([
            (LISTS_KEY, "{}"),
            (ACTIVE_LIST_KEY, "x"),
            (SETTINGS_KEY, "{}"),
        ]));
        let persistence = persistence_over(kv.clone());

        persistence.clear();
        persistence.flush();

        for key in ALL_KEYS {
            assert!(kv.get(key).unwrap().is_none());
        }
    }
}
