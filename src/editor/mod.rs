//! Editor module for Inkpad
//!
//! UI-facing editing helpers: the text editor widget, syntax colouring for
//! code mode, inline formatting commands and status bar statistics.

mod formatting;
mod highlight;
mod stats;
mod widget;

pub use formatting::FormatCommand;
pub use stats::TextStats;
pub use widget::EditorWidget;
