//! Modal dialogs for Inkpad.
//!
//! Each dialog owns its input fields and reports what the user confirmed;
//! the app runs the command and, on failure, puts the message back into
//! the dialog with [`Dialog::set_error`] so the user can correct it.

use crate::export::ExportFormat;
use crate::theme::ThemeColors;
use eframe::egui::{self, Key, RichText};

/// Which service an upload goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadChoice {
    Gist,
    Paste,
}

/// State for the active dialog.
#[derive(Debug, Clone)]
pub enum Dialog {
    SetPassword {
        password: String,
        confirm: String,
        error_message: Option<String>,
    },
    RemovePassword {
        password: String,
        error_message: Option<String>,
    },
    RenameTab {
        tab_id: u64,
        name_input: String,
        error_message: Option<String>,
    },
    Export {
        file_name: String,
        format: ExportFormat,
        error_message: Option<String>,
    },
    Upload {
        choice: UploadChoice,
        token_input: String,
        has_saved_token: bool,
        remember_token: bool,
        in_progress: bool,
        error_message: Option<String>,
    },
    Uploaded {
        url: String,
    },
}

/// Result from showing a dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogResult {
    /// Dialog still open
    None,
    Cancelled,
    SetPassword {
        password: String,
        confirm: String,
    },
    RemovePassword(String),
    RenameTab {
        tab_id: u64,
        name: String,
    },
    Export {
        file_name: String,
        format: ExportFormat,
    },
    Upload {
        choice: UploadChoice,
        /// Newly entered token; `None` means use the saved one
        token: Option<String>,
        remember_token: bool,
    },
    /// Delete the saved GitHub token
    ForgetToken,
    OpenUrl(String),
}

impl Dialog {
    pub fn set_password() -> Self {
        Self::SetPassword {
            password: String::new(),
            confirm: String::new(),
            error_message: None,
        }
    }

    pub fn remove_password() -> Self {
        Self::RemovePassword {
            password: String::new(),
            error_message: None,
        }
    }

    pub fn rename_tab(tab_id: u64, current_name: String) -> Self {
        Self::RenameTab {
            tab_id,
            name_input: current_name,
            error_message: None,
        }
    }

    pub fn export(file_name: String) -> Self {
        Self::Export {
            file_name,
            format: ExportFormat::default(),
            error_message: None,
        }
    }

    pub fn upload(has_saved_token: bool) -> Self {
        Self::Upload {
            choice: if has_saved_token {
                UploadChoice::Gist
            } else {
                UploadChoice::Paste
            },
            token_input: String::new(),
            has_saved_token,
            remember_token: true,
            in_progress: false,
            error_message: None,
        }
    }

    /// Show `message` inside the dialog and re-enable its buttons.
    pub fn set_error(&mut self, message: impl Into<String>) {
        let message = Some(message.into());
        match self {
            Dialog::SetPassword { error_message, .. }
            | Dialog::RemovePassword { error_message, .. }
            | Dialog::RenameTab { error_message, .. }
            | Dialog::Export { error_message, .. } => *error_message = message,
            Dialog::Upload {
                error_message,
                in_progress,
                ..
            } => {
                *error_message = message;
                *in_progress = false;
            }
            Dialog::Uploaded { .. } => {}
        }
    }

    /// Mark an upload dialog as waiting for the network.
    pub fn set_in_progress(&mut self) {
        if let Dialog::Upload {
            in_progress,
            error_message,
            ..
        } = self
        {
            *in_progress = true;
            *error_message = None;
        }
    }

    pub fn is_upload(&self) -> bool {
        matches!(self, Dialog::Upload { .. })
    }

    /// Show the dialog and return the result.
    pub fn show(&mut self, ctx: &egui::Context, colors: &ThemeColors) -> DialogResult {
        let busy = matches!(self, Dialog::Upload { in_progress: true, .. });
        if !busy && ctx.input(|i| i.key_pressed(Key::Escape)) {
            return DialogResult::Cancelled;
        }

        let mut result = DialogResult::None;
        let title = match self {
            Dialog::SetPassword { .. } => "🔑 Set Password",
            Dialog::RemovePassword { .. } => "🔓 Remove Password",
            Dialog::RenameTab { .. } => "Rename Tab",
            Dialog::Export { .. } => "💾 Export",
            Dialog::Upload { .. } => "☁ Upload",
            Dialog::Uploaded { .. } => "☁ Uploaded",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(colors.background)
                    .stroke(egui::Stroke::new(1.0, colors.border))
                    .rounding(8.0),
            )
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.add_space(6.0);
                let enter = ctx.input(|i| i.key_pressed(Key::Enter));

                match self {
                    Dialog::SetPassword {
                        password,
                        confirm,
                        error_message,
                    } => {
                        ui.label("Password:");
                        let first = ui.add(
                            egui::TextEdit::singleline(password)
                                .password(true)
                                .desired_width(300.0),
                        );
                        if password.is_empty() && confirm.is_empty() {
                            first.request_focus();
                        }
                        ui.label("Confirm password:");
                        let second = ui.add(
                            egui::TextEdit::singleline(confirm)
                                .password(true)
                                .desired_width(300.0),
                        );
                        show_error(ui, error_message, colors);
                        if buttons(ui, "Set Password", true, &mut result)
                            || (second.lost_focus() && enter)
                        {
                            result = DialogResult::SetPassword {
                                password: password.clone(),
                                confirm: confirm.clone(),
                            };
                        }
                    }
                    Dialog::RemovePassword {
                        password,
                        error_message,
                    } => {
                        ui.label("Enter the current password:");
                        let field = ui.add(
                            egui::TextEdit::singleline(password)
                                .password(true)
                                .desired_width(300.0),
                        );
                        if password.is_empty() {
                            field.request_focus();
                        }
                        show_error(ui, error_message, colors);
                        if buttons(ui, "Remove", !password.is_empty(), &mut result)
                            || (field.lost_focus() && enter && !password.is_empty())
                        {
                            result = DialogResult::RemovePassword(password.clone());
                        }
                    }
                    Dialog::RenameTab {
                        tab_id,
                        name_input,
                        error_message,
                    } => {
                        ui.label("Tab name:");
                        let field =
                            ui.add(egui::TextEdit::singleline(name_input).desired_width(300.0));
                        if !field.has_focus() && error_message.is_none() {
                            field.request_focus();
                        }
                        show_error(ui, error_message, colors);
                        let valid = !name_input.trim().is_empty();
                        if buttons(ui, "Rename", valid, &mut result)
                            || (field.lost_focus() && enter && valid)
                        {
                            result = DialogResult::RenameTab {
                                tab_id: *tab_id,
                                name: name_input.clone(),
                            };
                        }
                    }
                    Dialog::Export {
                        file_name,
                        format,
                        error_message,
                    } => {
                        ui.label("File name:");
                        ui.horizontal(|ui| {
                            ui.add(egui::TextEdit::singleline(file_name).desired_width(220.0));
                            ui.label(
                                RichText::new(format!(".{}", format.extension()))
                                    .color(colors.text_muted),
                            );
                        });
                        ui.add_space(4.0);
                        egui::ComboBox::from_id_source("export_format")
                            .selected_text(format.label())
                            .width(220.0)
                            .show_ui(ui, |ui| {
                                for &option in ExportFormat::all() {
                                    ui.selectable_value(format, option, option.label());
                                }
                            });
                        show_error(ui, error_message, colors);
                        if buttons(ui, "Export", true, &mut result) {
                            result = DialogResult::Export {
                                file_name: file_name.clone(),
                                format: *format,
                            };
                        }
                    }
                    Dialog::Upload {
                        choice,
                        token_input,
                        has_saved_token,
                        remember_token,
                        in_progress,
                        error_message,
                    } => {
                        ui.add_enabled_ui(!*in_progress, |ui| {
                            ui.radio_value(choice, UploadChoice::Paste, "Anonymous paste");
                            ui.radio_value(choice, UploadChoice::Gist, "GitHub Gist");
                            if *choice == UploadChoice::Gist {
                                ui.add_space(4.0);
                                let hint = if *has_saved_token {
                                    "Saved token (leave empty to use it)"
                                } else {
                                    "GitHub personal access token"
                                };
                                ui.add(
                                    egui::TextEdit::singleline(token_input)
                                        .password(true)
                                        .hint_text(hint)
                                        .desired_width(300.0),
                                );
                                ui.horizontal(|ui| {
                                    ui.checkbox(remember_token, "Remember token");
                                    if *has_saved_token
                                        && ui.button("Forget saved token").clicked()
                                    {
                                        result = DialogResult::ForgetToken;
                                    }
                                });
                            }
                        });
                        if *in_progress {
                            ui.add_space(6.0);
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label("Uploading…");
                            });
                        }
                        show_error(ui, error_message, colors);
                        let ready = !*in_progress
                            && (*choice == UploadChoice::Paste
                                || *has_saved_token
                                || !token_input.trim().is_empty());
                        if buttons(ui, "Upload", ready, &mut result) {
                            let token = if token_input.trim().is_empty() {
                                None
                            } else {
                                Some(token_input.trim().to_string())
                            };
                            result = DialogResult::Upload {
                                choice: *choice,
                                token,
                                remember_token: *remember_token,
                            };
                        }
                        if *in_progress && result == DialogResult::Cancelled {
                            result = DialogResult::None;
                        }
                    }
                    Dialog::Uploaded { url } => {
                        ui.label("Your document is available at:");
                        ui.hyperlink(url.as_str());
                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("Open in Browser").clicked() {
                                result = DialogResult::OpenUrl(url.clone());
                            }
                            if ui.button("Copy Link").clicked() {
                                ui.output_mut(|o| o.copied_text = url.clone());
                            }
                            if ui.button("Close").clicked() {
                                result = DialogResult::Cancelled;
                            }
                        });
                    }
                }
                ui.add_space(4.0);
            });

        result
    }
}

fn show_error(ui: &mut egui::Ui, error_message: &Option<String>, colors: &ThemeColors) {
    if let Some(error) = error_message {
        ui.add_space(4.0);
        ui.colored_label(colors.error, error.as_str());
    }
}

/// Confirm/Cancel row. Returns `true` when the confirm button was clicked.
fn buttons(ui: &mut egui::Ui, confirm: &str, enabled: bool, result: &mut DialogResult) -> bool {
    let mut confirmed = false;
    ui.add_space(10.0);
    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(enabled, egui::Button::new(confirm))
                .clicked()
            {
                confirmed = true;
            }
            ui.add_space(8.0);
            if ui.button("Cancel").clicked() {
                *result = DialogResult::Cancelled;
            }
        });
    });
    confirmed
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_error_stops_upload_progress() {
        let mut dialog = Dialog::upload(false);
        dialog.set_in_progress();
        assert!(matches!(dialog, Dialog::Upload { in_progress: true, .. }));

        dialog.set_error("Upload failed: timeout");
        match dialog {
            Dialog::Upload {
                in_progress,
                error_message,
                ..
            } => {
                assert!(!in_progress);
                assert_eq!(error_message.as_deref(), Some("Upload failed: timeout"));
            }
            _ => panic!("expected upload dialog"),
        }
    }

    #[test]
    fn test_upload_defaults_to_gist_with_saved_token() {
        assert!(matches!(
            Dialog::upload(true),
            Dialog::Upload {
                choice: UploadChoice::Gist,
                ..
            }
        ));
        assert!(matches!(
            Dialog::upload(false),
            Dialog::Upload {
                choice: UploadChoice::Paste,
                ..
            }
        ));
    }

    #[test]
    fn test_rename_keeps_current_name() {
        match Dialog::rename_tab(3, "Notes".to_string()) {
            Dialog::RenameTab {
                tab_id, name_input, ..
            } => {
                assert_eq!(tab_id, 3);
                assert_eq!(name_input, "Notes");
            }
            _ => panic!("expected rename dialog"),
        }
    }
}
