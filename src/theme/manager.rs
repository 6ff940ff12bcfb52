//! Theme Manager for Inkpad
//!
//! Remembers which theme is showing and pushes its visuals into the egui
//! context only when it changes.

use eframe::egui::Context;
use log::debug;

use super::{visuals_for, ThemeColors};
use crate::config::Theme;

/// Applies the session's theme to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            needs_apply: true,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Change the theme; takes effect on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            debug!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the theme if it changed since the last call. Returns `true` if
    /// the visuals were updated.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if !self.needs_apply {
            return false;
        }
        ctx.set_visuals(visuals_for(self.current_theme));
        self.needs_apply = false;
        true
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::for_theme(self.current_theme)
    }

    /// Icon for the toggle button: the theme a click switches to.
    pub fn icon(&self) -> &'static str {
        match self.current_theme {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }

    pub fn tooltip(&self) -> String {
        format!("Switch to {} theme", self.current_theme.toggled().label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_same_theme_does_not_reapply() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;
        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());
        manager.set_theme(Theme::Dark);
        assert!(manager.needs_apply());
        assert_eq!(manager.current_theme(), Theme::Dark);
    }

    #[test]
    fn test_apply_clears_flag() {
        let ctx = Context::default();
        let mut manager = ThemeManager::new(Theme::Dark);
        assert!(manager.apply_if_needed(&ctx));
        assert!(!manager.apply_if_needed(&ctx));
        assert!(ctx.style().visuals.dark_mode);
    }

    #[test]
    fn test_icon_points_at_other_theme() {
        assert_eq!(ThemeManager::new(Theme::Light).icon(), "🌙");
        assert!(ThemeManager::new(Theme::Dark).tooltip().contains("Light"));
    }
}
