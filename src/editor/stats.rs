//! Word and character counts for the status bar.

// ─────────────────────────────────────────────────────────────────────────────
// TextStats
// ─────────────────────────────────────────────────────────────────────────────

/// Counts for the visible document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    /// Runs of non-whitespace characters
    pub words: usize,
    /// Unicode scalar values, whitespace included
    pub characters: usize,
    /// Lines, counting a trailing empty line
    pub lines: usize,
}

impl TextStats {
    /// Count words, characters and lines in a single pass.
    pub fn from_text(text: &str) -> Self {
        let mut stats = Self {
            lines: 1,
            ..Self::default()
        };
        let mut in_word = false;

        for ch in text.chars() {
            stats.characters += 1;
            if ch == '\n' {
                stats.lines += 1;
            }
            if ch.is_whitespace() {
                in_word = false;
            } else if !in_word {
                in_word = true;
                stats.words += 1;
            }
        }
        stats
    }

    /// Status bar text, e.g. "Words: 2 | Characters: 11".
    pub fn format_status(&self) -> String {
        format!("Words: {} | Characters: {}", self.words, self.characters)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
