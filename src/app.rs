//! Main application module for Inkpad
//!
//! Implements the eframe App trait. Every user action is translated into a
//! `Session` command; errors come back as `Result`s and are routed to the
//! notification area (warnings) or an error modal (everything else).

use crate::cloud::{clear_token, load_token, save_token, UploadJob, UploadRequest, UploadTarget};
use crate::config::{font_label, save_config_silent, Settings};
use crate::editor::{EditorWidget, FormatCommand, TextStats};
use crate::error::{Error, Result, ResultExt};
use crate::export::{default_file_name, export, sanitize_file_name, ExportFormat};
use crate::files::{save_export_dialog, write_export};
use crate::session::{LockState, Session};
use crate::storage::KeyValueStore;
use crate::theme::{font_family_for, ThemeManager};
use crate::ui::{
    show_status_bar, show_tab_bar, Dialog, DialogResult, LockScreen, Notifications, StatusInfo,
    TabBarAction, TabEntry, Toolbar, ToolbarAction, ToolbarState, UploadChoice,
};
use eframe::egui::{self, Key, Modifiers};
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Store type the application runs on.
pub type AppStore = Box<dyn KeyValueStore>;

/// Poll interval while an upload is in flight.
const UPLOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// Save immediately (Ctrl+S)
    Save,
    /// New tab (Ctrl+T)
    NewTab,
    /// Close active tab (Ctrl+W)
    CloseTab,
    /// Restore last closed tab (Ctrl+Shift+T)
    RestoreTab,
    /// Lock the editor (Ctrl+L)
    Lock,
    /// Apply inline formatting (Ctrl+B / Ctrl+I / Ctrl+U)
    Format(FormatCommand),
}

/// The main application struct that holds all state and implements eframe::App.
pub struct InkpadApp {
    /// Editor state and persistence
    session: Session<AppStore>,
    /// Application preferences, kept for export directory and window size
    settings: Settings,
    theme_manager: ThemeManager,
    toolbar: Toolbar,
    lock_screen: LockScreen,
    /// Active modal dialog
    dialog: Option<Dialog>,
    notifications: Notifications,
    /// Upload running on a worker thread
    upload_job: Option<UploadJob>,
    /// Formatting to apply to the editor selection this frame
    pending_format: Option<FormatCommand>,
    /// Give the editor keyboard focus on the next frame
    focus_editor: bool,
}

impl InkpadApp {
    /// Create the app around an opened session.
    ///
    /// `startup_problem` is shown once, e.g. when the store could not be
    /// opened and an in-memory fallback is in use.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: Session<AppStore>,
        settings: Settings,
        startup_problem: Option<Error>,
    ) -> Self {
        let mut theme_manager = ThemeManager::new(session.theme());
        theme_manager.apply_if_needed(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", session.theme());

        let mut notifications = Notifications::new();
        if let Some(problem) = startup_problem {
            notifications.report(&problem, Instant::now());
        }

        Self {
            session,
            settings,
            theme_manager,
            toolbar: Toolbar::new(),
            lock_screen: LockScreen::new(),
            dialog: None,
            notifications,
            upload_job: None,
            pending_format: None,
            focus_editor: true,
        }
    }

    /// Route a command failure to the user.
    fn report(&mut self, error: Error) {
        warn!("{}", error);
        self.notifications.report(&error, Instant::now());
    }

    fn report_result<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    fn drain_session_warnings(&mut self) {
        let now = Instant::now();
        for warning in self.session.take_warnings() {
            self.notifications.report(&warning, now);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let action = ctx.input_mut(|i| {
            // Ctrl+Shift+T before Ctrl+T since it's more specific
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::T) {
                return Some(KeyboardAction::RestoreTab);
            }
            if i.consume_key(Modifiers::COMMAND, Key::T) {
                return Some(KeyboardAction::NewTab);
            }
            if i.consume_key(Modifiers::COMMAND, Key::W) {
                return Some(KeyboardAction::CloseTab);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::L) {
                return Some(KeyboardAction::Lock);
            }
            if i.consume_key(Modifiers::COMMAND, Key::B) {
                return Some(KeyboardAction::Format(FormatCommand::Bold));
            }
            if i.consume_key(Modifiers::COMMAND, Key::I) {
                return Some(KeyboardAction::Format(FormatCommand::Italic));
            }
            if i.consume_key(Modifiers::COMMAND, Key::U) {
                return Some(KeyboardAction::Format(FormatCommand::Underline));
            }
            None
        });

        let Some(action) = action else {
            return;
        };
        debug!("Keyboard shortcut: {:?}", action);
        match action {
            KeyboardAction::Save => self.handle_save_now(),
            KeyboardAction::NewTab => self.handle_new_tab(),
            KeyboardAction::CloseTab => {
                if let Some(id) = self.report_result(self.session.active_tab_id()) {
                    self.handle_close_tab(id);
                }
            }
            KeyboardAction::RestoreTab => self.handle_restore_tab(),
            KeyboardAction::Lock => {
                if self.session.has_password() {
                    self.handle_lock();
                }
            }
            KeyboardAction::Format(command) => {
                if !self.session.mode().is_code() {
                    self.pending_format = Some(command);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Commands
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_save_now(&mut self) {
        let result = self.session.save_now(Instant::now());
        if let Some(false) = self.report_result(result) {
            debug!("Nothing to save");
        }
    }

    fn handle_new_tab(&mut self) {
        let result = self.session.create_tab();
        if self.report_result(result).is_some() {
            self.focus_editor = true;
        }
    }

    fn handle_close_tab(&mut self, id: u64) {
        let result = self.session.close_tab(id);
        self.report_result(result);
    }

    fn handle_restore_tab(&mut self) {
        let result = self.session.restore_last_closed();
        if let Some(None) = self.report_result(result) {
            self.notifications.toast("No closed tabs to restore", Instant::now());
        }
    }

    fn handle_switch_tab(&mut self, id: u64) {
        let result = self.session.switch_tab(id);
        if let Some(true) = self.report_result(result) {
            self.focus_editor = true;
        }
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        let now = Instant::now();
        match action {
            ToolbarAction::NewTab => self.handle_new_tab(),
            ToolbarAction::RestoreTab => self.handle_restore_tab(),
            ToolbarAction::Format(command) => {
                self.pending_format = Some(command);
                self.focus_editor = true;
            }
            ToolbarAction::SetFont(font) => {
                let result = self.session.set_font(&font, now);
                self.report_result(result);
            }
            ToolbarAction::ToggleCodeMode => {
                let result = self.session.toggle_code_mode(now);
                self.report_result(result);
            }
            ToolbarAction::ToggleTheme => {
                let theme = self.session.toggle_theme();
                self.theme_manager.set_theme(theme);
            }
            ToolbarAction::Lock => self.handle_lock(),
            ToolbarAction::SetPassword => self.dialog = Some(Dialog::set_password()),
            ToolbarAction::RemovePassword => self.dialog = Some(Dialog::remove_password()),
            ToolbarAction::Export => self.dialog = Some(Dialog::export(default_file_name())),
            ToolbarAction::Upload => {
                let has_token = load_token(self.session.store())
                    .unwrap_or_warn_default(None, "Reading saved GitHub token")
                    .is_some();
                self.dialog = Some(Dialog::upload(has_token));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lock Commands
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_lock(&mut self) {
        let result = self.session.lock();
        if self.report_result(result).is_some() {
            self.dialog = None;
            self.pending_format = None;
            self.lock_screen.reset();
        }
    }

    fn handle_unlock(&mut self, password: &str) {
        match self.session.unlock(password) {
            Ok(()) => {
                self.lock_screen.reset();
                self.focus_editor = true;
            }
            Err(Error::Auth(message)) => self.lock_screen.set_error(message),
            Err(Error::Locked) => self.lock_screen.set_error("Editor is still locked"),
            Err(e) => {
                // Unlocked, but the documents could not be read back
                self.lock_screen.reset();
                self.report(e);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dialog Handling
    // ─────────────────────────────────────────────────────────────────────────

    fn render_dialog(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors();
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        let result = dialog.show(ctx, &colors);

        let outcome = match result {
            DialogResult::None => return,
            DialogResult::Cancelled => {
                self.dialog = None;
                return;
            }
            DialogResult::SetPassword { password, confirm } => {
                self.session.set_password(&password, &confirm).map(|()| {
                    info!("Password set");
                    true
                })
            }
            DialogResult::RemovePassword(password) => {
                self.session.remove_password(&password).map(|()| true)
            }
            DialogResult::RenameTab { tab_id, name } => self
                .session
                .rename_tab(tab_id, &name, Instant::now())
                .map(|()| true),
            DialogResult::Export { file_name, format } => self.handle_export(&file_name, format),
            DialogResult::Upload {
                choice,
                token,
                remember_token,
            } => self.handle_upload(choice, token, remember_token).map(|()| false),
            DialogResult::ForgetToken => clear_token(self.session.store_mut()).map(|()| {
                self.dialog = Some(Dialog::upload(false));
                false
            }),
            DialogResult::OpenUrl(url) => {
                if let Err(e) = open::that(&url) {
                    warn!("Failed to open {}: {}", url, e);
                }
                Ok(true)
            }
        };

        match outcome {
            Ok(true) => self.dialog = None,
            Ok(false) => {}
            Err(e) => {
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.set_error(e.to_string());
                }
            }
        }
    }

    /// Export the visible document. Returns `Ok(true)` once written,
    /// `Ok(false)` if the save dialog was cancelled.
    fn handle_export(&mut self, file_name: &str, format: ExportFormat) -> Result<bool> {
        let content = self.session.visible_content()?;
        let font = self.session.active_tab()?.font.clone();
        let exported = export(&content, file_name, &font, format)?;

        let Some(path) = save_export_dialog(
            self.settings.last_export_directory.as_deref(),
            &exported.file_name,
            format,
        ) else {
            return Ok(false);
        };
        write_export(&exported, &path)?;

        if let Some(parent) = path.parent() {
            self.settings.last_export_directory = Some(parent.to_path_buf());
            save_config_silent(&self.settings);
        }
        self.notifications
            .toast(format!("Exported {}", exported.file_name), Instant::now());
        Ok(true)
    }

    fn handle_upload(
        &mut self,
        choice: UploadChoice,
        token: Option<String>,
        remember_token: bool,
    ) -> Result<()> {
        let content = self.session.visible_content()?;
        let tab = self.session.active_tab()?;
        let is_code_mode = tab.is_code_mode;
        let base = sanitize_file_name(&tab.title(), ExportFormat::Text)
            .unwrap_or_else(|_| default_file_name());
        let file_name = format!("{}.{}", base, if is_code_mode { "js" } else { "txt" });

        let target = match choice {
            UploadChoice::Paste => UploadTarget::Paste {
                service_url: self.settings.paste_service_url.clone(),
            },
            UploadChoice::Gist => {
                let token = match token {
                    Some(token) => {
                        if remember_token {
                            save_token(self.session.store_mut(), &token)?;
                        }
                        token
                    }
                    None => load_token(self.session.store())?.ok_or_else(|| {
                        Error::Validation("Please enter a GitHub token".to_string())
                    })?,
                };
                UploadTarget::Gist {
                    token,
                    public: self.settings.gist_public,
                }
            }
        };

        let job = UploadJob::spawn(UploadRequest {
            target,
            file_name,
            content,
            is_code_mode,
        })?;
        info!("Started {} upload", job.target_label());
        self.upload_job = Some(job);
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.set_in_progress();
        }
        Ok(())
    }

    fn poll_upload(&mut self) {
        let Some(result) = self.upload_job.as_ref().and_then(UploadJob::poll) else {
            return;
        };
        self.upload_job = None;
        match result {
            Ok(url) => self.dialog = Some(Dialog::Uploaded { url }),
            Err(e @ Error::RemoteService(_)) => {
                if self.dialog.as_ref().is_some_and(Dialog::is_upload) {
                    self.dialog = None;
                }
                self.report(e);
            }
            Err(e) => match self.dialog.as_mut() {
                Some(dialog) if dialog.is_upload() => dialog.set_error(e.to_string()),
                _ => self.report(e),
            },
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_editor_ui(&mut self, ctx: &egui::Context, now: Instant) {
        let colors = self.theme_manager.colors();

        // Snapshot what the panels need before borrowing the buffer
        let (active_id, font, entries) = match (self.session.active_tab(), self.session.tabs()) {
            (Ok(active), Ok(tabs)) => (
                active.id,
                active.font.clone(),
                tabs.iter()
                    .map(|tab| TabEntry {
                        id: tab.id,
                        title: tab.title(),
                        is_code_mode: tab.is_code_mode,
                    })
                    .collect::<Vec<_>>(),
            ),
            _ => return,
        };
        let mode = self.session.mode();
        let stats = self
            .session
            .editor_buffer_mut()
            .map(|buffer| TextStats::from_text(buffer))
            .unwrap_or_default();

        // Toolbar
        let theme_tooltip = self.theme_manager.tooltip();
        let restore_title = self.session.last_closed_title();
        let toolbar_state = ToolbarState {
            colors: &colors,
            theme_icon: self.theme_manager.icon(),
            theme_tooltip: &theme_tooltip,
            font: &font,
            is_code_mode: mode.is_code(),
            can_restore: self.session.can_restore(),
            restore_title: restore_title.as_deref(),
            has_password: self.session.has_password(),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| self.toolbar.show(ui, toolbar_state))
            .inner;
        if let Some(action) = toolbar_action {
            self.handle_toolbar_action(action);
        }

        // Tab bar
        let tab_action = egui::TopBottomPanel::top("tab_bar")
            .show(ctx, |ui| show_tab_bar(ui, &entries, active_id, &colors))
            .inner;
        match tab_action {
            Some(TabBarAction::Switch(id)) => self.handle_switch_tab(id),
            Some(TabBarAction::Close(id)) => self.handle_close_tab(id),
            Some(TabBarAction::Rename(id)) => {
                if let Some(entry) = entries.iter().find(|entry| entry.id == id) {
                    self.dialog = Some(Dialog::rename_tab(id, entry.title.clone()));
                }
            }
            Some(TabBarAction::New) => self.handle_new_tab(),
            None => {}
        }

        // Status bar
        let saved_visible = self.session.indicator_visible(now);
        let toast = self.notifications.active_toast(now).map(str::to_string);
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            show_status_bar(
                ui,
                &StatusInfo {
                    stats,
                    mode_label: mode.label(),
                    font_label: font_label(&font),
                    saved_visible,
                    save_pending: self.session.autosave_pending(),
                    toast: toast.as_deref(),
                },
                &colors,
            );
        });

        // Editor; re-read mode and font in case a toolbar action changed them
        let mode = self.session.mode();
        let palette = self.session.code_palette();
        let font_family = self
            .session
            .active_tab()
            .map(|tab| font_family_for(&tab.font))
            .unwrap_or(egui::FontFamily::Proportional);
        // Per-tab id so each tab keeps its own cursor and scroll position
        let editing_id = self.session.active_tab_id().unwrap_or(active_id);
        let editor_id = egui::Id::new(("editor", editing_id));
        let format = self.pending_format.take();
        let request_focus = std::mem::take(&mut self.focus_editor) && self.dialog.is_none();

        let changed = egui::CentralPanel::default()
            .show(ctx, |ui| match self.session.editor_buffer_mut() {
                Ok(buffer) => {
                    EditorWidget::new(buffer, mode)
                        .palette(palette)
                        .font_family(font_family)
                        .id(editor_id)
                        .format(format)
                        .request_focus(request_focus)
                        .show(ui)
                        .changed
                }
                Err(_) => false,
            })
            .inner;

        if changed {
            self.session.content_changed(now);
            ctx.request_repaint();
        }
    }

    fn update_window_size(&mut self, ctx: &egui::Context) {
        let size = ctx.input(|i| i.viewport().inner_rect.map(|rect| rect.size()));
        if let Some(size) = size {
            self.settings.window_size.width = size.x;
            self.settings.window_size.height = size.y;
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let mut wakeups = vec![
            self.session.next_wakeup(now),
            self.notifications.next_wakeup(now),
        ];
        if self.upload_job.is_some() {
            wakeups.push(Some(UPLOAD_POLL_INTERVAL));
        }
        if let Some(delay) = wakeups.into_iter().flatten().min() {
            ctx.request_repaint_after(delay);
        }
    }
}

impl eframe::App for InkpadApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.theme_manager.set_theme(self.session.theme());
        self.theme_manager.apply_if_needed(ctx);
        self.update_window_size(ctx);

        // Fire a due autosave and hide an expired indicator
        self.session.tick(now);
        self.poll_upload();

        match self.session.lock_state() {
            LockState::Locked => {
                let colors = self.theme_manager.colors();
                if let Some(password) = self.lock_screen.show(ctx, &colors) {
                    self.handle_unlock(&password);
                }
            }
            LockState::Unlocked | LockState::NoPassword => {
                if self.dialog.is_none() && !self.notifications.has_modal() {
                    self.handle_keyboard_shortcuts(ctx);
                }
                self.render_editor_ui(ctx, now);
                self.render_dialog(ctx);
            }
        }

        self.drain_session_warnings();
        let colors = self.theme_manager.colors();
        self.notifications.show_modal(ctx, &colors);

        self.schedule_repaint(ctx, now);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        if let Err(e) = self.session.save() {
            warn!("Final save failed: {}", e);
        }
        save_config_silent(&self.settings);
    }
}
