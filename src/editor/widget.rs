//! Text editor widget for Inkpad
//!
//! Wraps egui's `TextEdit` around the live buffer of the mounted editing
//! surface. In code mode the text is laid out with syntax colours from the
//! contrasting code palette; in text mode it uses the tab's font.

use super::formatting::{apply_format, FormatCommand};
use super::highlight::{get_highlighter, DEFAULT_LANGUAGE};
use crate::session::{CodePalette, SurfaceKind};
use eframe::egui::text::{CCursor, CCursorRange};
use eframe::egui::{self, FontFamily, FontId, ScrollArea, TextEdit, Ui};
use log::debug;
use std::sync::Arc;

/// Point size of editor text.
const EDITOR_FONT_SIZE: f32 = 15.0;

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Whether the content was modified, by typing or by formatting.
    pub changed: bool,
}

pub struct EditorWidget<'a> {
    buffer: &'a mut String,
    mode: SurfaceKind,
    palette: CodePalette,
    font_family: FontFamily,
    id: Option<egui::Id>,
    format: Option<FormatCommand>,
    request_focus: bool,
}

impl<'a> EditorWidget<'a> {
    pub fn new(buffer: &'a mut String, mode: SurfaceKind) -> Self {
        Self {
            buffer,
            mode,
            palette: CodePalette::Dark,
            font_family: FontFamily::Proportional,
            id: None,
            format: None,
            request_focus: false,
        }
    }

    #[must_use]
    pub fn palette(mut self, palette: CodePalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Formatting to apply to the current selection this frame.
    #[must_use]
    pub fn format(mut self, command: Option<FormatCommand>) -> Self {
        self.format = command;
        self
    }

    #[must_use]
    pub fn request_focus(mut self, focus: bool) -> Self {
        self.request_focus = focus;
        self
    }

    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("editor"));
        let original_len = self.buffer.len();
        let original_hash = egui::util::hash(self.buffer.as_str());

        let palette = self.palette;
        let is_code = self.mode.is_code();
        let font_id = if is_code {
            FontId::monospace(EDITOR_FONT_SIZE)
        } else {
            FontId::new(EDITOR_FONT_SIZE, self.font_family.clone())
        };

        let layout_font = font_id.clone();
        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let job = if is_code {
                get_highlighter().layout_job(
                    text,
                    DEFAULT_LANGUAGE,
                    palette,
                    layout_font.clone(),
                    wrap_width,
                )
            } else {
                egui::text::LayoutJob::simple(
                    text.to_owned(),
                    layout_font.clone(),
                    ui.visuals().text_color(),
                    wrap_width,
                )
            };
            ui.fonts(|f| f.layout_job(job))
        };

        let mut frame = egui::Frame::none().inner_margin(egui::Margin::same(6.0));
        if is_code {
            frame = frame.fill(get_highlighter().background(palette));
        }

        let format = self.format;
        let request_focus = self.request_focus;
        let buffer = self.buffer;
        let mut formatted = false;
        frame.show(ui, |ui| {
            ScrollArea::vertical()
                .id_source(id.with("scroll"))
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let mut output = TextEdit::multiline(&mut *buffer)
                        .id(id)
                        .frame(false)
                        .font(font_id)
                        // Tab indents instead of moving focus in code mode
                        .lock_focus(is_code)
                        .desired_width(f32::INFINITY)
                        .desired_rows(20)
                        .layouter(&mut layouter)
                        .show(ui);

                    if request_focus {
                        output.response.request_focus();
                    }

                    let Some(command) = format else {
                        return;
                    };
                    // The live range is only reported while focused; a toolbar
                    // click takes focus, so fall back to the stored selection.
                    let selection = match output.cursor_range {
                        Some(range) => (range.primary.ccursor.index, range.secondary.ccursor.index),
                        None => match output.state.cursor.char_range() {
                            Some(range) => (range.primary.index, range.secondary.index),
                            None => return,
                        },
                    };
                    let result = apply_format(buffer, selection, command);
                    if result.text != *buffer {
                        *buffer = result.text;
                        formatted = true;
                        let (start, end) = result.selection;
                        output.state.cursor.set_char_range(Some(CCursorRange::two(
                            CCursor::new(start),
                            CCursor::new(end),
                        )));
                        output.state.store(ui.ctx(), id);
                        debug!("Applied {:?} to selection", command);
                    }
                });
        });

        let changed = formatted
            || buffer.len() != original_len
            || egui::util::hash(buffer.as_str()) != original_hash;
        EditorOutput { changed }
    }
}
