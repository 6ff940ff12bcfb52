//! User settings and preferences for Inkpad
//!
//! This module defines the `Settings` struct that holds the application-level
//! options, with serde support for JSON persistence. Per-document state
//! (tabs, theme, code mode) is not kept here; it lives in the key-value
//! store owned by the session.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Get a display label for the theme toggle button.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "☀ Light",
            Theme::Dark => "🌙 Dark",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Choices
// ─────────────────────────────────────────────────────────────────────────────

/// A selectable editor font: a display label and the identifier stored on a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontChoice {
    pub label: &'static str,
    pub id: &'static str,
}

/// Fonts offered in the font picker. The first entry is the default.
pub const FONT_CHOICES: &[FontChoice] = &[
    FontChoice {
        label: "Sans Serif",
        id: "'Segoe UI', Arial, sans-serif",
    },
    FontChoice {
        label: "Serif",
        id: "Georgia, 'Times New Roman', serif",
    },
    FontChoice {
        label: "Monospace",
        id: "'Courier New', monospace",
    },
];

/// Display label for a stored font identifier.
pub fn font_label(id: &str) -> &str {
    FONT_CHOICES
        .iter()
        .find(|choice| choice.id == id)
        .map(|choice| choice.label)
        .unwrap_or(id)
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 520.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Autosave
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet interval after the last edit before an autosave fires
    pub autosave_delay_ms: u64,

    /// How long the "Saved" indicator stays visible
    pub save_indicator_secs: f64,

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum number of closed tabs that can be restored
    pub undo_capacity: usize,

    /// Font identifier for newly created tabs
    pub default_font: String,

    // ─────────────────────────────────────────────────────────────────────────
    // Lock
    // ─────────────────────────────────────────────────────────────────────────
    /// Minimum password length accepted by the lock
    pub min_password_len: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Cloud Upload
    // ─────────────────────────────────────────────────────────────────────────
    /// Endpoint for anonymous paste uploads
    pub paste_service_url: String,

    /// Whether gists are created as public
    pub gist_public: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Export & Window
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory used for export
    pub last_export_directory: Option<PathBuf>,

    /// Window size
    pub window_size: WindowSize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave_delay_ms: 1000,
            save_indicator_secs: 2.0,
            undo_capacity: 20,
            default_font: FONT_CHOICES[0].id.to_string(),
            min_password_len: 4,
            paste_service_url: String::from("https://dpaste.com/api/v2/"),
            gist_public: false,
            last_export_directory: None,
            window_size: WindowSize::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    pub const MIN_AUTOSAVE_DELAY_MS: u64 = 250;
    pub const MAX_AUTOSAVE_DELAY_MS: u64 = 5000;
    pub const MIN_INDICATOR_SECS: f64 = 0.5;
    pub const MAX_INDICATOR_SECS: f64 = 10.0;
    pub const MAX_UNDO_CAPACITY: usize = 100;
    /// Passwords shorter than this are never accepted, whatever the config says.
    pub const MIN_PASSWORD_LEN: usize = 4;
    pub const MAX_PASSWORD_LEN: usize = 64;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.autosave_delay_ms = self
            .autosave_delay_ms
            .clamp(Self::MIN_AUTOSAVE_DELAY_MS, Self::MAX_AUTOSAVE_DELAY_MS);

        if !self.save_indicator_secs.is_finite() {
            self.save_indicator_secs = 2.0;
        }
        self.save_indicator_secs = self
            .save_indicator_secs
            .clamp(Self::MIN_INDICATOR_SECS, Self::MAX_INDICATOR_SECS);

        self.undo_capacity = self.undo_capacity.clamp(1, Self::MAX_UNDO_CAPACITY);

        self.min_password_len = self
            .min_password_len
            .clamp(Self::MIN_PASSWORD_LEN, Self::MAX_PASSWORD_LEN);

        if self.default_font.trim().is_empty() {
            self.default_font = FONT_CHOICES[0].id.to_string();
        }

        if self.paste_service_url.trim().is_empty() {
            self.paste_service_url = Settings::default().paste_service_url;
        }

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// The autosave debounce interval as a `Duration`.
    pub fn autosave_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_delay_ms)
    }

    /// The save indicator lifetime as a `Duration`.
    pub fn save_indicator_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.save_indicator_secs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.autosave_delay_ms, 1000);
        assert_eq!(settings.save_indicator_secs, 2.0);
        assert_eq!(settings.undo_capacity, 20);
        assert_eq!(settings.min_password_len, 4);
        assert_eq!(settings.default_font, FONT_CHOICES[0].id);
        assert!(!settings.gist_public);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert!(Theme::Dark.is_dark());
        assert!(!Theme::Light.is_dark());
    }

    #[test]
    fn test_theme_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        let theme: Theme = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(theme, Theme::Light);
    }

    #[test]
    fn test_font_label_lookup() {
        assert_eq!(font_label(FONT_CHOICES[2].id), "Monospace");
        assert_eq!(font_label("Comic Sans"), "Comic Sans");
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            autosave_delay_ms: 10,
            save_indicator_secs: 100.0,
            undo_capacity: 0,
            min_password_len: 1,
            default_font: "   ".to_string(),
            paste_service_url: String::new(),
            ..Settings::default()
        };
        settings.sanitize();

        assert_eq!(settings.autosave_delay_ms, Settings::MIN_AUTOSAVE_DELAY_MS);
        assert_eq!(settings.save_indicator_secs, Settings::MAX_INDICATOR_SECS);
        assert_eq!(settings.undo_capacity, 1);
        assert_eq!(settings.min_password_len, Settings::MIN_PASSWORD_LEN);
        assert_eq!(settings.default_font, FONT_CHOICES[0].id);
        assert_eq!(
            settings.paste_service_url,
            Settings::default().paste_service_url
        );
    }

    #[test]
    fn test_from_json_sanitized_fills_missing_fields() {
        let settings = Settings::from_json_sanitized(r#"{"autosave_delay_ms": 800}"#).unwrap();
        assert_eq!(settings.autosave_delay_ms, 800);
        assert_eq!(settings.undo_capacity, 20);
    }

    #[test]
    fn test_durations() {
        let settings = Settings::default();
        assert_eq!(settings.autosave_delay().as_millis(), 1000);
        assert_eq!(settings.save_indicator_duration().as_secs(), 2);
    }
}
