pub mod commands;
pub mod errors;
pub mod helpers;
pub mod suggestions;
pub mod transfer;
pub mod types;
pub mod views;

use crate::core::settings::Settings;
use crate::persistence::{Persistence, Snapshot};
use helpers::{default_lists, find_list};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use types::{List, ListMap};

/// In-memory list state plus the persistence handle it writes through.
///
/// Invariants: `lists` is never empty and `active_list_id` always names one of
/// its keys. Every operation in [`commands`] preserves both.
#[derive(Debug)]
pub struct ListStore {
    lists: ListMap,
    active_list_id: String,
    settings: Settings,
    persistence: Persistence,
}

impl ListStore {
    /// Build the store from whatever `persistence` has stored.
    pub fn load(persistence: Persistence) -> Self {
        let snapshot = persistence.load();
        Self::from_snapshot(snapshot, persistence)
    }

    /// Build the store from an explicit snapshot, repairing broken invariants.
    pub fn from_snapshot(snapshot: Snapshot, persistence: Persistence) -> Self {
        let Snapshot {
            mut lists,
            mut active_list_id,
            settings,
        } = snapshot;

        if lists.is_empty() {
            tracing::warn!(target: "lists", "Stored lists were empty, starting with the default list");
            lists = default_lists();
        }

        if find_list(&lists, &active_list_id).is_none() {
            let fallback = first_key(&lists);
            tracing::warn!(
                target: "lists",
                missing = %active_list_id,
                fallback = %fallback,
                "Active list not found, falling back to first list"
            );
            active_list_id = fallback;
        }

        Self {
            lists,
            active_list_id,
            settings,
            persistence,
        }
    }

    /// A store that starts from defaults and keeps nothing on disk.
    pub fn in_memory() -> Self {
        Self::from_snapshot(Snapshot::default(), Persistence::in_memory())
    }

    pub fn lists(&self) -> &ListMap {
        &self.lists
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        find_list(&self.lists, id)
    }

    pub fn active_list_id(&self) -> &str {
        &self.active_list_id
    }

    pub fn active_list(&self) -> &List {
        // Invariant: never empty, and the active id always resolves.
        self.list(&self.active_list_id)
            .or_else(|| self.lists.first())
            .unwrap_or_else(|| unreachable!("list store is never empty"))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Block until all pending writes have been stored.
    pub fn flush(&self) {
        self.persistence.flush();
    }
}

/// First key in insertion order; the fallback whenever the active list is lost.
fn first_key(lists: &ListMap) -> String {
    lists
        .first()
        .map(|list| list.id.clone())
        .unwrap_or_default()
}

/// Thread-safe handle for sharing one store with a UI layer.
#[derive(Debug)]
pub struct SharedListStore(pub RwLock<ListStore>);

impl SharedListStore {
    pub fn new(store: ListStore) -> Self {
        Self(RwLock::new(store))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ListStore> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ListStore> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Load the list store from the given persistence backend.
pub fn init_list_store(persistence: Persistence) -> SharedListStore {
    let store = ListStore::load(persistence);
    tracing::info!(
        target: "lists",
        "List store initialized: {} lists, active {}",
        store.lists().len(),
        store.active_list_id()
    );
    SharedListStore::new(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::helpers::DEFAULT_LIST_ID;

    #[test]
    fn test_in_memory_store_starts_with_default_list() {
        let store = ListStore::in_memory();
        assert_eq!(store.lists().len(), 1);
        assert_eq!(store.active_list_id(), DEFAULT_LIST_ID);
        assert_eq!(store.active_list().name, "My Shopping List");
        assert!(store.active_list().items.is_empty());
    }

    #[test]
    fn test_from_snapshot_repairs_empty_lists() {
        let snapshot = Snapshot {
            lists: ListMap::new(),
            active_list_id: "gone".to_string(),
            settings: Settings::default(),
        };
        let store = ListStore::from_snapshot(snapshot, Persistence::in_memory());

        assert_eq!(store.lists().len(), 1);
        assert_eq!(store.active_list_id(), DEFAULT_LIST_ID);
    }

    #[test]
    fn test_from_snapshot_repairs_dangling_active_id() {
        let lists: ListMap = [
            List {
                id: "first".to_string(),
                name: "First".to_string(),
                items: Vec::new(),
                created_at: 0,
            },
            List {
                id: "second".to_string(),
                name: "Second".to_string(),
                items: Vec::new(),
                created_at: 0,
            },
        ]
        .into_iter()
        .collect();

        let snapshot = Snapshot {
            lists,
            active_list_id: "missing".to_string(),
            settings: Settings::default(),
        };
        let store = ListStore::from_snapshot(snapshot, Persistence::in_memory());

        assert_eq!(store.active_list_id(), "first");
    }

    #[test]
    fn test_shared_store_read_write() {
        let shared = SharedListStore::new(ListStore::in_memory());
        {
            let mut store = shared.write();
            store.create_list("Party").unwrap();
        }
        assert_eq!(shared.read().lists().len(), 2);
    }
}
