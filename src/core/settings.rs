use serde::{Deserialize, Serialize};

/// User preferences, persisted separately from the lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub notifications_enabled: bool,
    #[serde(default = "default_show_completed")]
    pub show_completed: bool,
}

fn default_show_completed() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications_enabled: false,
            show_completed: default_show_completed(),
        }
    }
}

/// A partial settings record, as found in import documents.
/// Absent fields leave the current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_completed: Option<bool>,
}

impl Settings {
    /// Merge a partial record into these settings, field by field.
    pub fn merged(self, patch: SettingsPatch) -> Self {
        Self {
            dark_mode: patch.dark_mode.unwrap_or(self.dark_mode),
            notifications_enabled: patch
                .notifications_enabled
                .unwrap_or(self.notifications_enabled),
            show_completed: patch.show_completed.unwrap_or(self.show_completed),
        }
    }
}

/// Parse a persisted settings blob. Missing fields take their defaults.
pub fn parse_settings(contents: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str(contents)
}
