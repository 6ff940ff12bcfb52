//! Export formats.

/// Formats a document can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Html,
    Markdown,
    Rtf,
    Pdf,
}

impl ExportFormat {
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Text => "Plain Text (.txt)",
            ExportFormat::Html => "HTML (.html)",
            ExportFormat::Markdown => "Markdown (.md)",
            ExportFormat::Rtf => "Rich Text (.rtf)",
            ExportFormat::Pdf => "PDF (.pdf)",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Pdf => "pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain",
            ExportFormat::Html => "text/html",
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Rtf => "application/rtf",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Text,
            ExportFormat::Html,
            ExportFormat::Markdown,
            ExportFormat::Rtf,
            ExportFormat::Pdf,
        ]
    }
}
