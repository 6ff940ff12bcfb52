//! Theme System for Inkpad
//!
//! Colors and fonts for the two UI themes. The `Theme` enum itself lives in
//! `config::settings`; this module turns it into egui `Visuals` and maps
//! tab font identifiers onto egui font families.
//!
//! # Theme Files
//!
//! - `light.rs` - Light theme egui Visuals
//! - `dark.rs` - Dark theme egui Visuals
//! - `manager.rs` - Tracks the active theme and applies it to the context

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use crate::config::Theme;
use eframe::egui::{Color32, FontFamily, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors used across the UI for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    /// Main window and editor background
    pub background: Color32,
    /// Toolbar, tab bar and status bar background
    pub panel: Color32,
    /// Inputs and inactive tabs
    pub surface: Color32,
    pub border: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub selection: Color32,
    /// Save indicator
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,
}

impl ThemeColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(255, 255, 255),
            panel: Color32::from_rgb(245, 245, 245),
            surface: Color32::from_rgb(235, 235, 235),
            border: Color32::from_rgb(204, 204, 204),
            text: Color32::from_rgb(51, 51, 51),
            text_muted: Color32::from_rgb(120, 120, 120),
            accent: Color32::from_rgb(0, 120, 212),
            selection: Color32::from_rgb(204, 228, 247),
            success: Color32::from_rgb(40, 167, 69),
            warning: Color32::from_rgb(204, 136, 0),
            error: Color32::from_rgb(200, 35, 51),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(30, 30, 30),
            panel: Color32::from_rgb(37, 37, 38),
            surface: Color32::from_rgb(51, 51, 51),
            border: Color32::from_rgb(68, 68, 68),
            text: Color32::from_rgb(224, 224, 224),
            text_muted: Color32::from_rgb(150, 150, 150),
            accent: Color32::from_rgb(55, 148, 255),
            selection: Color32::from_rgb(38, 79, 120),
            success: Color32::from_rgb(76, 175, 80),
            warning: Color32::from_rgb(230, 180, 80),
            error: Color32::from_rgb(244, 88, 88),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }
}

/// egui Visuals for a theme.
pub fn visuals_for(theme: Theme) -> Visuals {
    match theme {
        Theme::Light => light::create_light_visuals(),
        Theme::Dark => dark::create_dark_visuals(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fonts
// ─────────────────────────────────────────────────────────────────────────────

/// egui family for a tab font identifier.
///
/// egui ships one proportional and one monospace face, so serif and sans
/// serif fonts both render proportionally.
pub fn font_family_for(font_id: &str) -> FontFamily {
    let lower = font_id.to_ascii_lowercase();
    if lower.contains("monospace") || lower.contains("courier") {
        FontFamily::Monospace
    } else {
        FontFamily::Proportional
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FONT_CHOICES;

    #[test]
    fn test_visuals_follow_theme() {
        assert!(!visuals_for(Theme::Light).dark_mode);
        assert!(visuals_for(Theme::Dark).dark_mode);
    }

    #[test]
    fn test_font_family_mapping() {
        assert_eq!(font_family_for("'Courier New', monospace"), FontFamily::Monospace);
        assert_eq!(font_family_for("Georgia, serif"), FontFamily::Proportional);
        assert_eq!(font_family_for("sans-serif"), FontFamily::Proportional);
        assert_eq!(font_family_for(FONT_CHOICES[2].id), FontFamily::Monospace);
    }

    #[test]
    fn test_text_contrasts_with_background() {
        for colors in [ThemeColors::light(), ThemeColors::dark()] {
            let diff = (colors.text.r() as i32 - colors.background.r() as i32).abs();
            assert!(diff > 128);
        }
    }
}
