//! Tab bar for Inkpad
//!
//! Wraps onto as many rows as the open tabs need. Clicking a tab switches
//! to it, double-clicking renames it, and the × button closes it.

use crate::theme::ThemeColors;
use eframe::egui::{self, RichText, Sense, Ui};

/// What the user did in the tab bar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabBarAction {
    Switch(u64),
    Close(u64),
    Rename(u64),
    New,
}

/// One entry to draw.
#[derive(Debug, Clone)]
pub struct TabEntry {
    pub id: u64,
    pub title: String,
    pub is_code_mode: bool,
}

const TAB_HEIGHT: f32 = 24.0;

/// Draw the tab bar and return any action.
pub fn show_tab_bar(
    ui: &mut Ui,
    tabs: &[TabEntry],
    active_id: u64,
    colors: &ThemeColors,
) -> Option<TabBarAction> {
    let mut action = None;
    let can_close = tabs.len() > 1;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(4.0, 2.0);

        for tab in tabs {
            let selected = tab.id == active_id;
            let frame = egui::Frame::none()
                .fill(if selected {
                    colors.selection
                } else {
                    colors.surface
                })
                .rounding(4.0)
                .inner_margin(egui::Margin::symmetric(8.0, 2.0));

            let inner = frame.show(ui, |ui| {
                ui.set_height(TAB_HEIGHT - 4.0);
                ui.horizontal(|ui| {
                    let label = if tab.is_code_mode {
                        format!("</> {}", tab.title)
                    } else {
                        tab.title.clone()
                    };
                    let mut text = RichText::new(label).color(colors.text);
                    if selected {
                        text = text.strong();
                    }
                    let title = ui
                        .add(egui::Label::new(text).sense(Sense::click()))
                        .on_hover_text("Double-click to rename");

                    let close = ui.add_enabled(
                        can_close,
                        egui::Button::new(RichText::new("×").color(colors.text_muted))
                            .frame(false)
                            .small(),
                    );
                    (title, close)
                })
                .inner
            });

            let (title, close) = inner.inner;
            let tab_area = inner.response.interact(Sense::click());

            if close.clicked() {
                action = Some(TabBarAction::Close(tab.id));
            } else if title.double_clicked() {
                action = Some(TabBarAction::Rename(tab.id));
            } else if (title.clicked() || tab_area.clicked()) && !selected {
                action = Some(TabBarAction::Switch(tab.id));
            }
            if can_close && tab_area.middle_clicked() {
                action = Some(TabBarAction::Close(tab.id));
            }
        }

        if ui
            .add(egui::Button::new("+").frame(false))
            .on_hover_text("New tab (Ctrl+T)")
            .clicked()
        {
            action = Some(TabBarAction::New);
        }
    });

    action
}
