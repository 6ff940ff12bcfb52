//! The persisted document model.

use serde::{Deserialize, Serialize};

/// One independently persisted document.
///
/// This is both the runtime tab and its stored form inside `editorData`;
/// field names serialize in camelCase to match the stored layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier, assigned from the registry counter and never reused
    pub id: u64,
    /// Display name shown in the tab bar
    pub name: String,
    /// Serialized document (plain text or markup)
    #[serde(default)]
    pub content: String,
    /// Font identifier used to render this tab
    #[serde(default)]
    pub font: String,
    /// Whether this tab is edited with the code surface
    #[serde(default)]
    pub is_code_mode: bool,
}

impl Tab {
    /// Create an empty text-mode tab.
    pub fn new(id: u64, font: impl Into<String>) -> Self {
        Self {
            id,
            name: default_tab_name(id),
            content: String::new(),
            font: font.into(),
            is_code_mode: false,
        }
    }

    /// Get the display title, falling back to the default name when blank.
    pub fn title(&self) -> String {
        if self.name.trim().is_empty() {
            default_tab_name(self.id)
        } else {
            self.name.clone()
        }
    }
}

/// Name given to a tab that was never renamed.
pub fn default_tab_name(id: u64) -> String {
    format!("Tab {}", id + 1)
}
