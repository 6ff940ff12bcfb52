//! Toolbar UI Component for Inkpad
//!
//! A single row of icon buttons grouped into tabs, formatting, view, lock
//! and share sections, plus the font picker.

use crate::config::{font_label, FONT_CHOICES};
use crate::editor::FormatCommand;
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the toolbar row.
const TOOLBAR_HEIGHT: f32 = 34.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(30.0, 26.0);

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    // Tabs
    NewTab,
    RestoreTab,

    // Formatting
    Format(FormatCommand),
    SetFont(String),

    // View
    ToggleCodeMode,
    ToggleTheme,

    // Lock
    Lock,
    SetPassword,
    RemovePassword,

    // Share
    Export,
    Upload,
}

/// What the toolbar needs to know to draw its buttons.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState<'a> {
    pub colors: &'a ThemeColors,
    pub theme_icon: &'a str,
    pub theme_tooltip: &'a str,
    pub font: &'a str,
    pub is_code_mode: bool,
    pub can_restore: bool,
    /// Title of the tab a restore would reopen
    pub restore_title: Option<&'a str>,
    pub has_password: bool,
}

/// The editor toolbar.
#[derive(Debug, Clone, Default)]
pub struct Toolbar;

impl Toolbar {
    pub fn new() -> Self {
        Self
    }

    pub fn height(&self) -> f32 {
        TOOLBAR_HEIGHT
    }

    /// Render the toolbar and return any triggered action.
    pub fn show(&mut self, ui: &mut Ui, state: ToolbarState<'_>) -> Option<ToolbarAction> {
        let mut action = None;
        let colors = state.colors;

        ui.horizontal(|ui| {
            ui.set_height(TOOLBAR_HEIGHT);
            ui.spacing_mut().item_spacing.x = 2.0;

            // ═══════════════════════════════════════════════════════════════════
            // Tabs
            // ═══════════════════════════════════════════════════════════════════
            if icon_button(ui, "➕", "New tab (Ctrl+T)", true, colors).clicked() {
                action = Some(ToolbarAction::NewTab);
            }
            let restore_tooltip = match state.restore_title {
                Some(title) => format!("Restore \"{}\" (Ctrl+Shift+T)", title),
                None => "No closed tabs to restore".to_string(),
            };
            if icon_button(ui, "↺", &restore_tooltip, state.can_restore, colors).clicked() {
                action = Some(ToolbarAction::RestoreTab);
            }

            separator(ui, colors);

            // ═══════════════════════════════════════════════════════════════════
            // Formatting
            // ═══════════════════════════════════════════════════════════════════
            for command in [
                FormatCommand::Bold,
                FormatCommand::Italic,
                FormatCommand::Underline,
            ] {
                if format_button(ui, command, !state.is_code_mode, colors).clicked() {
                    action = Some(ToolbarAction::Format(command));
                }
            }

            ui.add_space(4.0);
            egui::ComboBox::from_id_source("toolbar_font")
                .selected_text(font_label(state.font))
                .width(110.0)
                .show_ui(ui, |ui| {
                    for choice in FONT_CHOICES {
                        if ui
                            .selectable_label(choice.id == state.font, choice.label)
                            .clicked()
                            && choice.id != state.font
                        {
                            action = Some(ToolbarAction::SetFont(choice.id.to_string()));
                        }
                    }
                });

            separator(ui, colors);

            // ═══════════════════════════════════════════════════════════════════
            // View
            // ═══════════════════════════════════════════════════════════════════
            let mode_tooltip = if state.is_code_mode {
                "Switch to text mode"
            } else {
                "Switch to code mode"
            };
            if toggle_button(ui, "</>", mode_tooltip, state.is_code_mode, colors).clicked() {
                action = Some(ToolbarAction::ToggleCodeMode);
            }
            if icon_button(ui, state.theme_icon, state.theme_tooltip, true, colors).clicked() {
                action = Some(ToolbarAction::ToggleTheme);
            }

            separator(ui, colors);

            // ═══════════════════════════════════════════════════════════════════
            // Lock
            // ═══════════════════════════════════════════════════════════════════
            if state.has_password {
                if icon_button(ui, "🔒", "Lock (Ctrl+L)", true, colors).clicked() {
                    action = Some(ToolbarAction::Lock);
                }
                if icon_button(ui, "🔓", "Remove password", true, colors).clicked() {
                    action = Some(ToolbarAction::RemovePassword);
                }
            } else if icon_button(ui, "🔑", "Set password", true, colors).clicked() {
                action = Some(ToolbarAction::SetPassword);
            }

            separator(ui, colors);

            // ═══════════════════════════════════════════════════════════════════
            // Share
            // ═══════════════════════════════════════════════════════════════════
            if icon_button(ui, "💾", "Export", true, colors).clicked() {
                action = Some(ToolbarAction::Export);
            }
            if icon_button(ui, "☁", "Upload", true, colors).clicked() {
                action = Some(ToolbarAction::Upload);
            }
        });

        action
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Button Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn text_color(enabled: bool, colors: &ThemeColors) -> Color32 {
    if enabled {
        colors.text
    } else {
        colors.text_muted
    }
}

fn icon_button(
    ui: &mut Ui,
    icon: &str,
    tooltip: &str,
    enabled: bool,
    colors: &ThemeColors,
) -> Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(
            RichText::new(icon)
                .size(15.0)
                .color(text_color(enabled, colors)),
        )
        .frame(false)
        .min_size(ICON_BUTTON_SIZE),
    )
    .on_hover_text(tooltip)
}

fn toggle_button(
    ui: &mut Ui,
    label: &str,
    tooltip: &str,
    active: bool,
    colors: &ThemeColors,
) -> Response {
    let button = egui::Button::new(RichText::new(label).size(12.0).color(colors.text))
        .min_size(ICON_BUTTON_SIZE)
        .fill(if active {
            colors.selection
        } else {
            Color32::TRANSPARENT
        });
    ui.add(button).on_hover_text(tooltip)
}

fn format_button(
    ui: &mut Ui,
    command: FormatCommand,
    enabled: bool,
    colors: &ThemeColors,
) -> Response {
    let mut text = RichText::new(command.icon())
        .size(13.0)
        .color(text_color(enabled, colors));
    text = match command {
        FormatCommand::Bold => text.strong(),
        FormatCommand::Italic => text.italics(),
        FormatCommand::Underline => text.underline(),
    };
    ui.add_enabled(
        enabled,
        egui::Button::new(text)
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    )
    .on_hover_text(command.tooltip())
}

fn separator(ui: &mut Ui, colors: &ThemeColors) {
    ui.add_space(4.0);
    let (rect, _response) =
        ui.allocate_exact_size(Vec2::new(1.0, TOOLBAR_HEIGHT - 10.0), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, colors.border),
    );
    ui.add_space(4.0);
}
