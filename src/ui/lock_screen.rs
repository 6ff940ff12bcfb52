//! Lock screen for Inkpad
//!
//! Covers the whole window while the editor is locked. It only ever sees
//! the password field; no document content is passed in.

use crate::theme::ThemeColors;
use eframe::egui::{self, Key, RichText};

#[derive(Debug, Clone, Default)]
pub struct LockScreen {
    password_input: String,
    error_message: Option<String>,
}

impl LockScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a failed attempt and clear the field.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.password_input.clear();
    }

    pub fn reset(&mut self) {
        self.password_input.clear();
        self.error_message = None;
    }

    /// Draw the lock screen. Returns the entered password on submit.
    pub fn show(&mut self, ctx: &egui::Context, colors: &ThemeColors) -> Option<String> {
        let mut submitted = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(colors.background))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.25);
                    ui.label(RichText::new("🔒").size(48.0));
                    ui.add_space(8.0);
                    ui.label(RichText::new("Editor Locked").size(20.0).color(colors.text));
                    ui.label(
                        RichText::new("Enter your password to continue")
                            .color(colors.text_muted),
                    );
                    ui.add_space(12.0);

                    let field = ui.add(
                        egui::TextEdit::singleline(&mut self.password_input)
                            .password(true)
                            .hint_text("Password")
                            .desired_width(220.0),
                    );
                    if !field.has_focus() && self.password_input.is_empty() {
                        field.request_focus();
                    }

                    if let Some(error) = &self.error_message {
                        ui.add_space(4.0);
                        ui.colored_label(colors.error, error.as_str());
                    }

                    ui.add_space(8.0);
                    let enter = field.lost_focus() && ctx.input(|i| i.key_pressed(Key::Enter));
                    if (ui.button("Unlock").clicked() || enter) && !self.password_input.is_empty()
                    {
                        submitted = Some(std::mem::take(&mut self.password_input));
                    }
                });
            });

        submitted
    }
}
