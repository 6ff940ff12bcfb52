//! Dark Theme Configuration
//!
//! Converts `ThemeColors::dark()` into egui `Visuals`.

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

use super::ThemeColors;

const ROUNDING: f32 = 4.0;

/// Create egui Visuals configured for the dark theme.
pub fn create_dark_visuals() -> Visuals {
    let colors = ThemeColors::dark();
    let mut visuals = Visuals::dark();

    // ─────────────────────────────────────────────────────────────────────────
    // Backgrounds
    // ─────────────────────────────────────────────────────────────────────────
    visuals.panel_fill = colors.panel;
    visuals.window_fill = colors.background;
    visuals.extreme_bg_color = colors.background;
    visuals.faint_bg_color = colors.panel;
    visuals.code_bg_color = colors.surface;

    // ─────────────────────────────────────────────────────────────────────────
    // Text & Selection
    // ─────────────────────────────────────────────────────────────────────────
    visuals.override_text_color = None;
    visuals.warn_fg_color = colors.warning;
    visuals.error_fg_color = colors.error;
    visuals.hyperlink_color = colors.accent;
    visuals.selection.bg_fill = colors.selection;
    visuals.selection.stroke = Stroke::new(1.0, colors.accent);

    // ─────────────────────────────────────────────────────────────────────────
    // Widgets
    // ─────────────────────────────────────────────────────────────────────────
    visuals.widgets.noninteractive.bg_fill = colors.panel;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.border);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text);

    visuals.widgets.inactive.bg_fill = colors.surface;
    visuals.widgets.inactive.weak_bg_fill = colors.surface;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text);

    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, colors.accent);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text);

    visuals.widgets.active.bg_fill = colors.accent;
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(ROUNDING);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Windows
    // ─────────────────────────────────────────────────────────────────────────
    visuals.window_rounding = Rounding::same(ROUNDING * 2.0);
    visuals.window_stroke = Stroke::new(1.0, colors.border);
    visuals.window_shadow = egui::epaint::Shadow {
        offset: egui::vec2(0.0, 4.0),
        blur: 16.0,
        spread: 0.0,
        color: Color32::from_black_alpha(80),
    };

    visuals.dark_mode = true;
    visuals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_visuals_mode() {
        assert_eq!(create_dark_visuals().dark_mode, true);
    }

    #[test]
    fn test_dark_visuals_use_theme_colors() {
        let visuals = create_dark_visuals();
        let colors = ThemeColors::dark();
        assert_eq!(visuals.panel_fill, colors.panel);
        assert_eq!(visuals.widgets.noninteractive.fg_stroke.color, colors.text);
        assert_ne!(visuals.selection.bg_fill, visuals.panel_fill);
    }
}
