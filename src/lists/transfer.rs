//! Export and import of the whole store as one JSON document.

use super::errors::TransferError;
use super::helpers::find_list;
use super::types::ListMap;
use super::{first_key, ListStore};
use crate::core::settings::{Settings, SettingsPatch};
use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    lists: &'a ListMap,
    current_list_id: &'a str,
    settings: &'a Settings,
    export_date: String,
}

/// Suggested file name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("shopping-lists-{}.json", date.format("%Y-%m-%d"))
}

impl ListStore {
    /// Serialize lists, active list and settings into a self-describing document.
    pub fn export_snapshot(&self) -> Result<String, TransferError> {
        let document = ExportDocument {
            lists: &self.lists,
            current_list_id: &self.active_list_id,
            settings: &self.settings,
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        let json = serde_json::to_string_pretty(&document).map_err(TransferError::Serialize)?;
        tracing::info!(target: "lists", lists = self.lists.len(), bytes = json.len(), "Snapshot exported");
        Ok(json)
    }

    /// Replace lists and active list with the contents of an export document.
    ///
    /// The document is fully validated before anything changes; on error the
    /// store is untouched. Settings present in the document overwrite the
    /// current ones field by field, absent fields are kept.
    pub fn import_snapshot(&mut self, blob: &str) -> Result<(), TransferError> {
        let (lists, active_list_id, settings_patch) = parse_import(blob).map_err(|e| {
            tracing::warn!(target: "lists", "Import rejected: {}", e);
            e
        })?;

        self.lists = lists;
        self.active_list_id = active_list_id;
        self.settings = self.settings.merged(settings_patch);

        tracing::info!(
            target: "lists",
            lists = self.lists.len(),
            active_list_id = %self.active_list_id,
            "Snapshot imported"
        );

        self.persist_all();
        Ok(())
    }
}

fn parse_import(blob: &str) -> Result<(ListMap, String, SettingsPatch), TransferError> {
    let document: Value = serde_json::from_str(blob)?;

    let lists_value = document
        .get("lists")
        .filter(|value| value.is_object())
        .ok_or(TransferError::MissingLists)?;

    let lists = ListMap::deserialize(lists_value).map_err(TransferError::InvalidList)?;
    if lists.is_empty() {
        return Err(TransferError::EmptyLists);
    }

    let active_list_id = document
        .get("currentListId")
        .and_then(Value::as_str)
        .filter(|id| find_list(&lists, id).is_some())
        .map(str::to_string)
        .unwrap_or_else(|| first_key(&lists));

    let settings_patch = document
        .get("settings")
        .map(settings_patch_from)
        .unwrap_or_default();

    Ok((lists, active_list_id, settings_patch))
}

fn settings_patch_from(settings: &Value) -> SettingsPatch {
    let flag = |name: &str| settings.get(name).and_then(Value::as_bool);

    SettingsPatch {
        dark_mode: flag("darkMode"),
        notifications_enabled: flag("notificationsEnabled"),
        show_completed: flag("showCompleted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::helpers::DEFAULT_LIST_ID;
    use crate::lists::types::Category;
    use serde_json::json;

    #[test]
    fn test_export_document_shape() {
        let store = ListStore::in_memory();
        let json: Value = serde_json::from_str(&store.export_snapshot().unwrap()).unwrap();

        assert!(json["lists"][DEFAULT_LIST_ID].is_object());
        assert_eq!(json["currentListId"], DEFAULT_LIST_ID);
        assert_eq!(json["settings"]["showCompleted"], true);

        let export_date = json["exportDate"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(export_date).is_ok());
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "shopping-lists-2024-03-09.json");
    }

    #[test]
    fn test_import_rejects_bad_documents() {
        let mut store = ListStore::in_memory();
        store
            .add_item(DEFAULT_LIST_ID, "Milk", Category::Dairy)
            .unwrap();
        let before = store.lists().clone();

        for blob in [
            "not json",
            r#"{"currentListId": "a"}"#,
            r#"{"lists": []}"#,
            r#"{"lists": "nope"}"#,
            r#"{"lists": {}}"#,
            r#"{"lists": {"a": 3}}"#,
            r#"{"lists": {"a": {"name": "   "}}}"#,
            r#"{"lists": {"a": {"name": "A", "items": [{"id": "x", "itemName": "   "}]}}}"#,
        ] {
            assert!(store.import_snapshot(blob).is_err(), "accepted {}", blob);
        }

        assert_eq!(store.lists(), &before);
        assert_eq!(store.active_list_id(), DEFAULT_LIST_ID);
    }

    #[test]
    fn test_import_falls_back_to_first_list() {
        let mut store = ListStore::in_memory();
        let blob = json!({
            "lists": {
                "groceries": {"id": "groceries", "name": "Groceries", "items": [], "createdAt": 1},
                "hardware": {"id": "hardware", "name": "Hardware", "items": [], "createdAt": 2}
            },
            "currentListId": "deleted"
        })
        .to_string();

        store.import_snapshot(&blob).unwrap();
        assert_eq!(store.active_list_id(), "groceries");
        assert_eq!(store.lists().len(), 2);
    }

    #[test]
    fn test_import_merges_settings_per_field() {
        let mut store = ListStore::in_memory();
        store.set_dark_mode(true);
        store.set_show_completed(false);

        let blob = json!({
            "lists": {"a": {"name": "A"}},
            "settings": {"notificationsEnabled": true}
        })
        .to_string();

        store.import_snapshot(&blob).unwrap();
        let settings = store.settings();
        assert!(settings.dark_mode);
        assert!(settings.notifications_enabled);
        assert!(!settings.show_completed);
    }
}
