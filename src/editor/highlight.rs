//! Syntax colouring for the code surface.
//!
//! Converts syntect highlighting into an egui `LayoutJob` that a `TextEdit`
//! layouter can render directly. Syntax and theme sets are loaded once and
//! shared through a global instance.

use crate::session::CodePalette;
use eframe::egui::text::{LayoutJob, TextFormat};
use eframe::egui::{Color32, FontId, Stroke};
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Language assumed for code mode.
pub const DEFAULT_LANGUAGE: &str = "js";

/// Used when a palette names a theme syntect does not ship.
const FALLBACK_THEME: &str = "base16-ocean.dark";

// ─────────────────────────────────────────────────────────────────────────────
// Code Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Cached syntect syntax and theme sets.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter {
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Theme for a palette. `None` only if syntect's bundled themes are missing.
    fn theme(&self, palette: CodePalette) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(palette.syntect_theme())
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Background colour the code surface should be painted with.
    pub fn background(&self, palette: CodePalette) -> Color32 {
        self.theme(palette)
            .and_then(|theme| theme.settings.background)
            .map(syntect_to_egui_color)
            .unwrap_or(if palette.is_dark() {
                Color32::from_rgb(43, 48, 59)
            } else {
                Color32::WHITE
            })
    }

    fn find_syntax(&self, language: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension(language)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Lay out `code` with syntax colours from `palette`.
    ///
    /// Lines syntect cannot highlight fall back to the theme foreground.
    pub fn layout_job(
        &self,
        code: &str,
        language: &str,
        palette: CodePalette,
        font_id: FontId,
        wrap_width: f32,
    ) -> LayoutJob {
        let mut job = LayoutJob::default();
        job.wrap.max_width = wrap_width;

        let Some(theme) = self.theme(palette) else {
            job.append(code, 0.0, TextFormat::simple(font_id, Color32::GRAY));
            return job;
        };
        let plain_color = theme
            .settings
            .foreground
            .map(syntect_to_egui_color)
            .unwrap_or(Color32::GRAY);

        let mut highlighter = HighlightLines::new(self.find_syntax(language), theme);
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    for (style, text) in ranges {
                        job.append(text, 0.0, style_to_format(style, font_id.clone()));
                    }
                }
                Err(e) => {
                    warn!("Failed to highlight line: {}", e);
                    job.append(line, 0.0, TextFormat::simple(font_id.clone(), plain_color));
                }
            }
        }
        job
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

pub fn syntect_to_egui_color(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn style_to_format(style: Style, font_id: FontId) -> TextFormat {
    let color = syntect_to_egui_color(style.foreground);
    TextFormat {
        font_id,
        color,
        italics: style.font_style.contains(FontStyle::ITALIC),
        underline: if style.font_style.contains(FontStyle::UNDERLINE) {
            Stroke::new(1.0, color)
        } else {
            Stroke::NONE
        },
        ..Default::default()
    }
}

static HIGHLIGHTER: OnceLock<CodeHighlighter> = OnceLock::new();

/// Shared highlighter, loaded on first use.
pub fn get_highlighter() -> &'static CodeHighlighter {
    HIGHLIGHTER.get_or_init(CodeHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
