//! UI components for Inkpad
//!
//! Widgets and dialogs drawn around the editor. They hold only input state;
//! every change to documents goes through `Session` in the app.

mod dialogs;
mod lock_screen;
mod notifications;
mod status_bar;
mod tab_bar;
mod toolbar;

pub use dialogs::{Dialog, DialogResult, UploadChoice};
pub use lock_screen::LockScreen;
pub use notifications::Notifications;
pub use status_bar::{show_status_bar, StatusInfo};
pub use tab_bar::{show_tab_bar, TabBarAction, TabEntry};
pub use toolbar::{Toolbar, ToolbarAction, ToolbarState};
