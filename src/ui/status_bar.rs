//! Status bar for Inkpad.

use crate::editor::TextStats;
use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Ui};

/// Everything the status bar displays.
#[derive(Debug, Clone)]
pub struct StatusInfo<'a> {
    pub stats: TextStats,
    pub mode_label: &'a str,
    pub font_label: &'a str,
    pub saved_visible: bool,
    /// An autosave is scheduled but has not run yet
    pub save_pending: bool,
    pub toast: Option<&'a str>,
}

pub fn show_status_bar(ui: &mut Ui, info: &StatusInfo<'_>, colors: &ThemeColors) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(info.stats.format_status()).color(colors.text_muted));

        if info.saved_visible {
            ui.separator();
            ui.label(RichText::new("✓ Saved").color(colors.success));
        } else if info.save_pending {
            ui.separator();
            ui.label(RichText::new("●").color(colors.text_muted))
                .on_hover_text("Unsaved changes");
        }

        if let Some(toast) = info.toast {
            ui.separator();
            ui.label(RichText::new(toast).italics().color(colors.warning));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(info.font_label).color(colors.text_muted));
            ui.separator();
            ui.label(RichText::new(info.mode_label).color(colors.text_muted));
        });
    });
}
