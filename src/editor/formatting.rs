//! Markdown-style inline formatting for the text surface.
//!
//! Selections are character indices, matching what the egui text cursor
//! reports, and are converted to byte offsets internally.

// ─────────────────────────────────────────────────────────────────────────────
// Format Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Inline formatting commands bound to the toolbar and shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    /// Bold text (**text**)
    Bold,
    /// Italic text (*text*)
    Italic,
    /// Underlined text (__text__)
    Underline,
}

impl FormatCommand {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Bold => "**",
            Self::Italic => "*",
            Self::Underline => "__",
        }
    }

    pub fn shortcut_label(self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Underline => "Ctrl+U",
        }
    }

    /// Toolbar button text.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Bold => "B",
            Self::Italic => "I",
            Self::Underline => "U",
        }
    }

    pub fn tooltip(self) -> String {
        let name = match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
        };
        format!("{} ({})", name, self.shortcut_label())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a formatting command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub text: String,
    /// New selection as character indices
    pub selection: (usize, usize),
    /// Whether markers were added (false when removed or nothing changed)
    pub applied: bool,
}

/// Byte offset of a character index, clamped to the end of `text`.
fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Wrap the selection in the command's marker, or unwrap it if the selection
/// already carries the marker on both sides.
///
/// An empty selection leaves the text untouched.
pub fn apply_format(text: &str, selection: (usize, usize), command: FormatCommand) -> FormatResult {
    let (start, end) = if selection.0 <= selection.1 {
        selection
    } else {
        (selection.1, selection.0)
    };
    let total = text.chars().count();
    let (start, end) = (start.min(total), end.min(total));

    if start == end {
        return FormatResult {
            text: text.to_string(),
            selection: (start, end),
            applied: false,
        };
    }

    let marker = command.marker();
    let marker_chars = marker.chars().count();
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);
    let selected = &text[start_byte..end_byte];

    if selected.len() >= marker.len() * 2
        && selected.starts_with(marker)
        && selected.ends_with(marker)
    {
        let inner = &selected[marker.len()..selected.len() - marker.len()];
        let new_text = format!("{}{}{}", &text[..start_byte], inner, &text[end_byte..]);
        return FormatResult {
            text: new_text,
            selection: (start, end - marker_chars * 2),
            applied: false,
        };
    }

    let new_text = format!(
        "{}{}{}{}{}",
        &text[..start_byte],
        marker,
        selected,
        marker,
        &text[end_byte..]
    );
    FormatResult {
        text: new_text,
        selection: (start, end + marker_chars * 2),
        applied: true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
