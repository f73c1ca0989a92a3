//! State Container operations.
//!
//! Each successful mutation queues a write of the affected blob(s). Invalid
//! input returns an error or `false` and leaves the store untouched.

use super::errors::StoreError;
use super::helpers::{
    default_lists, find_item, find_list, find_list_mut, items_with_id_mut, new_id, now_ms,
    DEFAULT_LIST_ID,
};
use super::types::{clamp_quantity, sanitize_price, Category, Item, ItemPatch, List};
use super::{first_key, ListStore};
use crate::core::settings::Settings;
use crate::persistence::SnapshotPatch;

impl ListStore {
    /// Append a new item to a list. The name is trimmed and must not be blank.
    pub fn add_item(
        &mut self,
        list_id: &str,
        name: &str,
        category: Category,
    ) -> Result<Item, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let list = find_list_mut(&mut self.lists, list_id)
            .ok_or_else(|| StoreError::ListNotFound(list_id.to_string()))?;

        let item = Item {
            id: new_id(),
            item_name: name.to_string(),
            quantity: 1,
            price: 0.0,
            category,
            is_selected: false,
            added_at: now_ms(),
        };

        list.items.push(item.clone());
        tracing::debug!(target: "lists", list_id, item_id = %item.id, "Item added");

        self.persist_lists();
        Ok(item)
    }

    /// Merge `patch` into every item with `item_id`. Returns `false` for an
    /// unknown list or item, which is not an error: the caller may hold a
    /// stale id.
    pub fn update_item(&mut self, list_id: &str, item_id: &str, patch: ItemPatch) -> bool {
        let mut updated = 0;
        if let Some(list) = find_list_mut(&mut self.lists, list_id) {
            for item in items_with_id_mut(list, item_id) {
                apply_patch(item, &patch);
                updated += 1;
            }
        }

        if updated == 0 {
            tracing::debug!(target: "lists", list_id, item_id, "Update for unknown item ignored");
            return false;
        }

        self.persist_lists();
        true
    }

    /// Flip the completed state of an item.
    pub fn toggle_item(&mut self, list_id: &str, item_id: &str) -> bool {
        let selected = find_list(&self.lists, list_id)
            .and_then(|list| find_item(list, item_id))
            .map(|item| item.is_selected);

        match selected {
            Some(selected) => {
                self.update_item(list_id, item_id, ItemPatch::new().selected(!selected))
            }
            None => false,
        }
    }

    /// Add `delta` to an item's quantity, flooring at 0.
    pub fn adjust_quantity(&mut self, list_id: &str, item_id: &str, delta: i64) -> bool {
        let quantity = find_list(&self.lists, list_id)
            .and_then(|list| find_item(list, item_id))
            .map(|item| i64::from(item.quantity));

        match quantity {
            Some(quantity) => self.update_item(
                list_id,
                item_id,
                ItemPatch::new().quantity(quantity.saturating_add(delta)),
            ),
            None => false,
        }
    }

    pub fn delete_item(&mut self, list_id: &str, item_id: &str) -> bool {
        let Some(list) = find_list_mut(&mut self.lists, list_id) else {
            return false;
        };

        let before = list.items.len();
        list.items.retain(|item| item.id != item_id);
        if list.items.len() == before {
            return false;
        }

        tracing::debug!(target: "lists", list_id, item_id, "Item deleted");
        self.persist_lists();
        true
    }

    /// Create an empty list and make it the active one.
    pub fn create_list(&mut self, name: &str) -> Result<List, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }

        let list = List {
            id: new_id(),
            name: name.to_string(),
            items: Vec::new(),
            created_at: now_ms(),
        };

        self.lists.insert(list.clone());
        self.active_list_id = list.id.clone();
        tracing::info!(target: "lists", list_id = %list.id, "List created");

        self.persistence.save(
            SnapshotPatch::lists(&self.lists).with_active_list_id(&self.active_list_id),
        );
        Ok(list)
    }

    /// Delete a list. The last remaining list can never be deleted.
    ///
    /// If the deleted list was active, the first remaining list (in insertion
    /// order) becomes active.
    pub fn delete_list(&mut self, list_id: &str) -> Result<(), StoreError> {
        if find_list(&self.lists, list_id).is_none() {
            return Err(StoreError::ListNotFound(list_id.to_string()));
        }
        if self.lists.len() <= 1 {
            return Err(StoreError::LastList);
        }

        self.lists.remove(list_id);
        tracing::info!(target: "lists", list_id, "List deleted");

        if self.active_list_id == list_id {
            self.active_list_id = first_key(&self.lists);
            self.persistence.save(
                SnapshotPatch::lists(&self.lists).with_active_list_id(&self.active_list_id),
            );
        } else {
            self.persist_lists();
        }
        Ok(())
    }

    pub fn set_active_list(&mut self, list_id: &str) -> Result<(), StoreError> {
        if find_list(&self.lists, list_id).is_none() {
            return Err(StoreError::ListNotFound(list_id.to_string()));
        }

        self.active_list_id = list_id.to_string();
        self.persistence
            .save(SnapshotPatch::active_list_id(&self.active_list_id));
        Ok(())
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.settings.dark_mode = enabled;
        self.persist_settings();
    }

    /// Returns `true` when notifications were just switched on, so the caller
    /// can schedule a reminder.
    pub fn set_notifications_enabled(&mut self, enabled: bool) -> bool {
        let switched_on = enabled && !self.settings.notifications_enabled;
        self.settings.notifications_enabled = enabled;
        self.persist_settings();
        switched_on
    }

    pub fn set_show_completed(&mut self, show: bool) {
        self.settings.show_completed = show;
        self.persist_settings();
    }

    /// Wipe stored data and return to a single empty default list with
    /// default settings. Irreversible; callers must confirm first.
    pub fn reset_all(&mut self) {
        self.persistence.clear();

        self.lists = default_lists();
        self.active_list_id = DEFAULT_LIST_ID.to_string();
        self.settings = Settings::default();
        tracing::info!(target: "lists", "All data reset");

        self.persist_all();
    }

    pub(super) fn persist_all(&self) {
        self.persistence.save(
            SnapshotPatch::lists(&self.lists)
                .with_active_list_id(&self.active_list_id)
                .with_settings(&self.settings),
        );
    }

    fn persist_lists(&self) {
        self.persistence.save(SnapshotPatch::lists(&self.lists));
    }

    fn persist_settings(&self) {
        self.persistence.save(SnapshotPatch::settings(&self.settings));
    }
}

fn apply_patch(item: &mut Item, patch: &ItemPatch) {
    if let Some(name) = patch.item_name.as_deref() {
        let name = name.trim();
        if !name.is_empty() {
            item.item_name = name.to_string();
        }
    }
    if let Some(quantity) = patch.quantity {
        item.quantity = clamp_quantity(quantity);
    }
    if let Some(price) = patch.price {
        item.price = sanitize_price(price);
    }
    if let Some(category) = patch.category {
        item.category = category;
    }
    if let Some(selected) = patch.is_selected {
        item.is_selected = selected;
    }
}
