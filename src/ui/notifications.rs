//! Transient warnings and blocking error messages.
//!
//! Warnings (failed autosaves, unreadable surfaces) appear as a toast in the
//! status bar for a few seconds. Everything else opens a modal that stays
//! until dismissed.

use crate::error::Error;
use crate::theme::ThemeColors;
use eframe::egui::{self, Key};
use std::time::{Duration, Instant};

/// How long a warning toast stays visible.
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Default)]
pub struct Notifications {
    toast: Option<(String, Instant)>,
    modal: Option<String>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an error to a toast or a modal.
    pub fn report(&mut self, error: &Error, now: Instant) {
        if error.is_warning() {
            self.toast(error.to_string(), now);
        } else {
            self.modal = Some(error.to_string());
        }
    }

    pub fn toast(&mut self, message: impl Into<String>, now: Instant) {
        self.toast = Some((message.into(), now + TOAST_DURATION));
    }

    /// Current toast text, dropping it once expired.
    pub fn active_toast(&mut self, now: Instant) -> Option<&str> {
        if self.toast.as_ref().is_some_and(|(_, until)| now >= *until) {
            self.toast = None;
        }
        self.toast.as_ref().map(|(message, _)| message.as_str())
    }

    /// Time until the toast expires, for scheduling a repaint.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.toast
            .as_ref()
            .map(|(_, until)| until.saturating_duration_since(now))
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    /// Draw the error modal, if any.
    pub fn show_modal(&mut self, ctx: &egui::Context, colors: &ThemeColors) {
        let Some(message) = &self.modal else {
            return;
        };
        let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter));

        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_max_width(360.0);
                ui.colored_label(colors.error, message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.modal = None;
        }
    }
}
