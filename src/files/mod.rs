//! File operations module for Inkpad
//!
//! Native save dialogs for exports and writing exported bytes to disk.

mod dialogs;

pub use dialogs::{save_export_dialog, write_export};
