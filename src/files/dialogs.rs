//! Native file dialog integration using the rfd crate

use crate::error::Result;
use crate::export::{ExportFormat, ExportedFile};
use log::info;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Opens a native save dialog for an export.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_export_dialog(
    initial_dir: Option<&Path>,
    file_name: &str,
    format: ExportFormat,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Export Document")
        .add_filter(format.label(), &[format.extension()])
        .add_filter("All Files", &["*"])
        .set_file_name(file_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}

/// Write an export to `path`.
pub fn write_export(file: &ExportedFile, path: &Path) -> Result<()> {
    std::fs::write(path, &file.bytes)?;
    info!("Exported {} bytes to {}", file.bytes.len(), path.display());
    Ok(())
}
