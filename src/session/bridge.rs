//! Uniform read/write access to whichever editing surface is mounted.
//!
//! The editor has two surfaces: a plain text area and a code surface with
//! syntax colouring. Only one is active at a time and the mode can flip at
//! runtime; the bridge moves content across so nothing is lost. The code
//! surface is built lazily through a factory the first time code mode is
//! entered and reused afterwards.

use crate::config::Theme;
use crate::error::Result;
use log::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Surface Kinds & Palettes
// ─────────────────────────────────────────────────────────────────────────────

/// Which editing surface is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    #[default]
    Text,
    Code,
}

impl SurfaceKind {
    pub fn from_code_mode(is_code_mode: bool) -> Self {
        if is_code_mode {
            SurfaceKind::Code
        } else {
            SurfaceKind::Text
        }
    }

    pub fn is_code(self) -> bool {
        matches!(self, SurfaceKind::Code)
    }

    pub fn label(self) -> &'static str {
        match self {
            SurfaceKind::Text => "📝 Text",
            SurfaceKind::Code => "💻 Code",
        }
    }
}

/// Colour palette of the code surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePalette {
    Light,
    Dark,
}

impl CodePalette {
    /// Palette for a UI theme. Inverted on purpose: a light UI gets a dark
    /// code surface and the other way round.
    pub fn contrasting(theme: Theme) -> Self {
        match theme {
            Theme::Light => CodePalette::Dark,
            Theme::Dark => CodePalette::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, CodePalette::Dark)
    }

    /// Name of the syntect theme that renders this palette.
    pub fn syntect_theme(self) -> &'static str {
        match self {
            CodePalette::Dark => "base16-ocean.dark",
            CodePalette::Light => "InspiredGitHub",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editing Surfaces
// ─────────────────────────────────────────────────────────────────────────────

/// An editing surface the bridge can read from and write into.
pub trait EditingSurface {
    /// Current content. May fail if the surface cannot be read.
    fn read(&self) -> Result<String>;

    /// Replace the content.
    fn write(&mut self, text: &str);

    /// Live buffer the UI binds its text widget to.
    fn buffer_mut(&mut self) -> &mut String;

    /// Apply a colour palette. Surfaces without colouring ignore it.
    fn set_palette(&mut self, _palette: CodePalette) {}

    fn palette(&self) -> Option<CodePalette> {
        None
    }
}

/// Plain multi-line text area.
#[derive(Debug, Default)]
pub struct TextSurface {
    buffer: String,
}

impl EditingSurface for TextSurface {
    fn read(&self) -> Result<String> {
        Ok(self.buffer.clone())
    }

    fn write(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
    }

    fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }
}

/// Code surface with a syntax colour palette.
#[derive(Debug)]
pub struct CodeSurface {
    buffer: String,
    palette: CodePalette,
}

impl CodeSurface {
    pub fn new(palette: CodePalette) -> Self {
        Self {
            buffer: String::new(),
            palette,
        }
    }
}

impl EditingSurface for CodeSurface {
    fn read(&self) -> Result<String> {
        Ok(self.buffer.clone())
    }

    fn write(&mut self, text: &str) {
        self.buffer.clear();
        self.buffer.push_str(text);
    }

    fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    fn set_palette(&mut self, palette: CodePalette) {
        self.palette = palette;
    }

    fn palette(&self) -> Option<CodePalette> {
        Some(self.palette)
    }
}

/// Builds the code surface on first use.
pub type SurfaceFactory = Box<dyn FnMut() -> Box<dyn EditingSurface>>;

// ─────────────────────────────────────────────────────────────────────────────
// Content Bridge
// ─────────────────────────────────────────────────────────────────────────────

pub struct ContentBridge {
    text: Box<dyn EditingSurface>,
    code: Option<Box<dyn EditingSurface>>,
    code_factory: SurfaceFactory,
    active: SurfaceKind,
    theme: Theme,
    /// Last content read or written successfully
    last_known_good: String,
}

impl ContentBridge {
    pub fn new(text: Box<dyn EditingSurface>, code_factory: SurfaceFactory) -> Self {
        Self {
            text,
            code: None,
            code_factory,
            active: SurfaceKind::Text,
            theme: Theme::default(),
            last_known_good: String::new(),
        }
    }

    /// Bridge over the built-in text and code surfaces.
    pub fn with_default_surfaces() -> Self {
        Self::new(
            Box::<TextSurface>::default(),
            Box::new(|| -> Box<dyn EditingSurface> {
                Box::new(CodeSurface::new(CodePalette::Dark))
            }),
        )
    }

    pub fn mode(&self) -> SurfaceKind {
        self.active
    }

    pub fn code_surface_built(&self) -> bool {
        self.code.is_some()
    }

    /// Palette of the code surface, if it has been built.
    pub fn code_palette(&self) -> Option<CodePalette> {
        self.code.as_ref().and_then(|surface| surface.palette())
    }

    /// Read the visible content.
    ///
    /// Never fails: if the active surface cannot be read, the last
    /// known-good content is returned instead of an empty string.
    pub fn get_content(&mut self) -> String {
        match self.active_surface().read() {
            Ok(content) => {
                self.last_known_good.clone_from(&content);
                content
            }
            Err(e) => {
                warn!("{}; using last known content", e);
                self.last_known_good.clone()
            }
        }
    }

    /// Write into the active surface.
    pub fn set_content(&mut self, text: &str) {
        self.active_surface_mut().write(text);
        self.last_known_good = text.to_string();
    }

    /// Live buffer of the active surface, for binding a text widget.
    pub fn buffer_mut(&mut self) -> &mut String {
        self.active_surface_mut().buffer_mut()
    }

    /// Switch surfaces, carrying the current content across.
    pub fn set_mode(&mut self, mode: SurfaceKind) {
        if mode == self.active {
            return;
        }
        let content = self.get_content();
        self.active_surface_mut().write("");

        if mode.is_code() {
            self.ensure_code_surface();
        }
        self.active = mode;
        self.set_content(&content);
        debug!("Editing surface switched to {:?}", mode);
    }

    /// Track the UI theme; the code surface gets the contrasting palette.
    pub fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Some(code) = self.code.as_mut() {
            code.set_palette(CodePalette::contrasting(theme));
        }
    }

    /// Clear every surface and the cached content.
    pub fn unmount(&mut self) {
        self.text.write("");
        if let Some(code) = self.code.as_mut() {
            code.write("");
        }
        self.last_known_good.clear();
    }

    fn ensure_code_surface(&mut self) {
        if self.code.is_none() {
            debug!("Building code surface");
            let mut surface = (self.code_factory)();
            surface.set_palette(CodePalette::contrasting(self.theme));
            self.code = Some(surface);
        }
    }

    fn active_surface(&self) -> &(dyn EditingSurface + 'static) {
        match (self.active, self.code.as_ref()) {
            (SurfaceKind::Code, Some(code)) => &**code,
            _ => &*self.text,
        }
    }

    fn active_surface_mut(&mut self) -> &mut (dyn EditingSurface + 'static) {
        match (self.active, self.code.as_mut()) {
            (SurfaceKind::Code, Some(code)) => &mut **code,
            _ => &mut *self.text,
        }
    }
}

impl Default for ContentBridge {
    fn default() -> Self {
        Self::with_default_surfaces()
    }
}

impl std::fmt::Debug for ContentBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentBridge")
            .field("active", &self.active)
            .field("theme", &self.theme)
            .field("code_surface_built", &self.code.is_some())
            .finish_non_exhaustive()
    }
}

/// Surface whose reads always fail, standing in for a widget that has gone
/// away underneath the bridge.
#[cfg(test)]
pub(crate) struct BrokenSurface {
    pub buffer: String,
}

#[cfg(test)]
impl EditingSurface for BrokenSurface {
    fn read(&self) -> Result<String> {
        Err(crate::error::Error::StorageRead(
            "surface detached".to_string(),
        ))
    }

    fn write(&mut self, text: &str) {
        self.buffer = text.to_string();
    }

    fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_plain_text_survives_mode_round_trip() {
        let mut bridge = ContentBridge::default();
        bridge.set_content("line one\n\tline two  \n");

        bridge.set_mode(SurfaceKind::Code);
        assert_eq!(bridge.get_content(), "line one\n\tline two  \n");

        bridge.set_mode(SurfaceKind::Text);
        assert_eq!(bridge.get_content(), "line one\n\tline two  \n");
    }

    #[test]
    fn test_edits_in_buffer_are_visible() {
        let mut bridge = ContentBridge::default();
        bridge.buffer_mut().push_str("typed");
        assert_eq!(bridge.get_content(), "typed");
    }

    #[test]
    fn test_code_surface_built_once() {
        let builds = Rc::new(Cell::new(0));
        let counter = Rc::clone(&builds);
        let mut bridge = ContentBridge::new(
            Box::<TextSurface>::default(),
            Box::new(move || -> Box<dyn EditingSurface> {
                counter.set(counter.get() + 1);
                Box::new(CodeSurface::new(CodePalette::Light))
            }),
        );

        assert!(!bridge.code_surface_built());
        bridge.set_mode(SurfaceKind::Code);
        bridge.set_mode(SurfaceKind::Text);
        bridge.set_mode(SurfaceKind::Code);

        assert_eq!(builds.get(), 1);
        assert!(bridge.code_surface_built());
    }

    #[test]
    fn test_code_palette_is_inverted() {
        let mut bridge = ContentBridge::default();
        bridge.apply_theme(Theme::Light);
        bridge.set_mode(SurfaceKind::Code);
        assert_eq!(bridge.code_palette(), Some(CodePalette::Dark));

        bridge.apply_theme(Theme::Dark);
        assert_eq!(bridge.code_palette(), Some(CodePalette::Light));
    }

    #[test]
    fn test_failed_read_returns_last_known_good() {
        let mut bridge = ContentBridge::new(
            Box::new(BrokenSurface {
                buffer: String::new(),
            }),
            Box::new(|| -> Box<dyn EditingSurface> {
                Box::new(CodeSurface::new(CodePalette::Dark))
            }),
        );
        bridge.set_content("keep me");
        assert_eq!(bridge.get_content(), "keep me");
    }

    #[test]
    fn test_unmount_clears_content() {
        let mut bridge = ContentBridge::default();
        bridge.set_content("secret");
        bridge.set_mode(SurfaceKind::Code);
        bridge.unmount();
        assert_eq!(bridge.get_content(), "");
        bridge.set_mode(SurfaceKind::Text);
        assert_eq!(bridge.get_content(), "");
    }
}
