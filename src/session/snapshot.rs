//! Stored payloads for `editorData` and `editorSettings`.

use super::tab::Tab;
use crate::config::Theme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whole-document snapshot, written wholesale on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorData {
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub active_tab_id: u64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// Lightweight UI preference mirror, written alongside `EditorData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub is_code_mode: bool,
}

/// Single-document layout written before tabs existed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyEditorData {
    pub content: String,
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub is_code_mode: bool,
}

/// Any `editorData` layout the editor knows how to read.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredEditorData {
    Tabs(EditorData),
    Legacy(LegacyEditorData),
}

impl StoredEditorData {
    /// Normalize to the tabbed layout. A legacy document becomes tab 0.
    pub fn into_current(self, default_font: &str) -> EditorData {
        match self {
            StoredEditorData::Tabs(data) => data,
            StoredEditorData::Legacy(legacy) => {
                let mut tab = Tab::new(0, legacy.font.unwrap_or_else(|| default_font.to_string()));
                tab.content = legacy.content;
                tab.is_code_mode = legacy.is_code_mode;
                EditorData {
                    tabs: vec![tab],
                    active_tab_id: 0,
                    theme: legacy.theme.unwrap_or_default(),
                    timestamp: Utc::now(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_data_field_names() {
        let data = EditorData {
            tabs: vec![Tab::new(0, "serif")],
            active_tab_id: 0,
            theme: Theme::Dark,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("activeTabId").is_some());
        assert_eq!(json["theme"], "dark");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_parses_tabbed_layout() {
        let json = r#"{
            "tabs": [{"id": 3, "name": "Notes", "content": "hi", "font": "serif", "isCodeMode": true}],
            "activeTabId": 3,
            "theme": "dark",
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let stored: StoredEditorData = serde_json::from_str(json).unwrap();
        let data = stored.into_current("sans");
        assert_eq!(data.active_tab_id, 3);
        assert_eq!(data.theme, Theme::Dark);
        assert!(data.tabs[0].is_code_mode);
    }

    #[test]
    fn test_migrates_legacy_layout() {
        let json = r#"{
            "content": "old note",
            "font": "Georgia",
            "theme": "dark",
            "isCodeMode": false,
            "timestamp": "2023-01-01T00:00:00.000Z"
        }"#;
        let stored: StoredEditorData = serde_json::from_str(json).unwrap();
        assert!(matches!(stored, StoredEditorData::Legacy(_)));

        let data = stored.into_current("sans");
        assert_eq!(data.tabs.len(), 1);
        assert_eq!(data.tabs[0].id, 0);
        assert_eq!(data.tabs[0].content, "old note");
        assert_eq!(data.tabs[0].font, "Georgia");
        assert_eq!(data.theme, Theme::Dark);
    }

    #[test]
    fn test_unknown_layout_fails() {
        let result: Result<StoredEditorData, _> = serde_json::from_str(r#"{"foo": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_editor_settings_defaults() {
        let settings: EditorSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.is_code_mode);
    }
}
