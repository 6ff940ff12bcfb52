//! Document Export Module for Inkpad
//!
//! Every export is a pure function of the document content, the chosen
//! file name and the tab font; writing the bytes to disk is left to the
//! caller.
//!
//! # Supported Export Formats
//!
//! - **Text** / **Markdown**: the content unchanged
//! - **HTML**: escaped content in a `<pre>` block styled with the tab font
//! - **RTF**: single-font rich text
//! - **PDF**: wrapped plain text on A4 pages

mod html;
mod options;
mod pdf;
mod rtf;

pub use options::ExportFormat;

use html::render_html;
use pdf::render_pdf;
use rtf::render_rtf;

use crate::error::{Error, Result};
use chrono::Utc;
use regex::Regex;
use std::sync::OnceLock;

/// A rendered export ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Suggested base name for a new export.
pub fn default_file_name() -> String {
    format!("document_{}", Utc::now().timestamp_millis())
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| {
        Regex::new(r#"[\\/:*?"<>|\x00-\x1f]"#).expect("file name pattern should compile")
    })
}

/// Validate a user-entered base name and make it safe for the filesystem.
///
/// Fails with `Validation` for an empty name. A trailing extension that
/// matches the format is dropped so it is not doubled.
pub fn sanitize_file_name(name: &str, format: ExportFormat) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Please enter a file name".to_string()));
    }
    let suffix = format!(".{}", format.extension());
    let base = if trimmed.len() > suffix.len()
        && trimmed.to_ascii_lowercase().ends_with(&suffix)
    {
        &trimmed[..trimmed.len() - suffix.len()]
    } else {
        trimmed
    };
    let cleaned = unsafe_chars().replace_all(base, "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        return Err(Error::Validation("Please enter a valid file name".to_string()));
    }
    Ok(cleaned.to_string())
}

/// Render `content` in `format`.
pub fn export(content: &str, file_name: &str, font: &str, format: ExportFormat) -> Result<ExportedFile> {
    let base = sanitize_file_name(file_name, format)?;
    let bytes = match format {
        ExportFormat::Text | ExportFormat::Markdown => content.as_bytes().to_vec(),
        ExportFormat::Html => render_html(content, &base, font).into_bytes(),
        ExportFormat::Rtf => render_rtf(content, font).into_bytes(),
        ExportFormat::Pdf => render_pdf(content, &base, font),
    };
    Ok(ExportedFile {
        file_name: format!("{}.{}", base, format.extension()),
        mime: format.mime(),
        bytes,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
