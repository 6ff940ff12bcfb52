//! Editor session for Inkpad
//!
//! `Session` owns every piece of editor state: the tab registry, the
//! closed-tab history, the content bridge over the editing surfaces, the
//! autosave scheduler, the lock gate and the persistent store. The UI layer
//! calls its command methods and never touches those parts directly.
//!
//! While the gate is locked the documents are dropped from memory and the
//! surfaces are cleared, so no accessor can hand out content until a
//! successful unlock reloads it from the store.

mod autosave;
mod bridge;
mod lock;
mod registry;
mod snapshot;
mod tab;
mod undo;

pub use bridge::{CodePalette, SurfaceKind};
pub use lock::LockState;
pub use tab::Tab;

use autosave::AutosaveScheduler;
use bridge::ContentBridge;
use lock::LockGate;
use registry::TabRegistry;
use snapshot::{EditorData, EditorSettings, StoredEditorData};
use undo::ClosedTabStack;

use crate::config::{Settings, Theme};
use crate::error::{Error, Result};
use crate::storage::{
    read_key, write_key, KeyValueStore, EDITOR_DATA_BACKUP_KEY, EDITOR_DATA_KEY,
    EDITOR_SETTINGS_KEY, IS_LOCKED_KEY, PASSWORD_HASH_KEY,
};
use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;
use std::time::{Duration, Instant};

/// Documents that exist only while the editor is unlocked.
#[derive(Debug)]
struct Documents {
    registry: TabRegistry,
    closed: ClosedTabStack,
}

/// Write a key, retrying once before giving up.
fn write_with_retry<S, T>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    match write_key(store, key, value) {
        Ok(()) => Ok(()),
        Err(first) => {
            warn!("Write of '{}' failed ({}), retrying once", key, first);
            write_key(store, key, value)
        }
    }
}

#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    store: S,
    settings: Settings,
    gate: LockGate,
    docs: Option<Documents>,
    bridge: ContentBridge,
    theme: Theme,
    autosave: AutosaveScheduler,
    /// Set once the initial load has completed; saves are refused before that
    data_loaded: bool,
    /// The user changed the placeholder documents of a failed load
    edited_before_load: bool,
    /// Non-blocking problems waiting to be shown
    warnings: Vec<Error>,
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session over `store`.
    ///
    /// Reads the lock credential first. If the editor is locked, documents
    /// stay unloaded until `unlock`; otherwise they are loaded immediately.
    pub fn open(store: S, settings: Settings) -> Result<Self> {
        Self::with_bridge(store, settings, ContentBridge::with_default_surfaces())
    }

    /// Open a session with a custom content bridge.
    pub fn with_bridge(store: S, settings: Settings, bridge: ContentBridge) -> Result<Self> {
        let hash: Option<String> = read_key(&store, PASSWORD_HASH_KEY)?;
        let is_locked = read_key::<bool, _>(&store, IS_LOCKED_KEY)?.unwrap_or(false);
        let gate = LockGate::from_stored(hash, is_locked);

        let autosave =
            AutosaveScheduler::new(settings.autosave_delay(), settings.save_indicator_duration());

        let mut session = Self {
            store,
            settings,
            gate,
            docs: None,
            bridge,
            theme: Theme::default(),
            autosave,
            data_loaded: false,
            edited_before_load: false,
            warnings: Vec::new(),
        };

        // The theme is not secret, so it is restored even behind the lock.
        session.theme = session.stored_preferences().theme;
        session.bridge.apply_theme(session.theme);

        if session.gate.is_locked() {
            info!("Session opened locked");
        } else if let Err(e) = session.load() {
            warn!("Could not load documents: {}", e);
            session.warnings.push(e);
        }
        Ok(session)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading & Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// (Re)hydrate documents from the store and push the active tab into
    /// the editing surface. Saves are enabled only once this succeeds.
    pub fn load(&mut self) -> Result<()> {
        if self.gate.is_locked() {
            return Err(Error::Locked);
        }
        self.data_loaded = false;
        self.edited_before_load = false;
        let font = self.settings.default_font.clone();

        let stored: Result<Option<StoredEditorData>> = read_key(&self.store, EDITOR_DATA_KEY);
        let (registry, theme, load_result) = match stored {
            Ok(Some(stored)) => {
                let data = stored.into_current(&font);
                let registry = TabRegistry::from_tabs(data.tabs, data.active_tab_id, &font);
                (registry, data.theme, Ok(()))
            }
            Ok(None) => {
                let prefs = self.stored_preferences();
                let mut registry = TabRegistry::new(&font);
                registry.active_tab_mut().is_code_mode = prefs.is_code_mode;
                (registry, prefs.theme, Ok(()))
            }
            // Saves are enabled only once the unreadable value is kept
            // under the backup key.
            Err(e @ Error::ConfigParse { .. }) => {
                warn!("{}; starting with an empty document", e);
                self.warnings.push(e);
                let backup = self.back_up_unreadable_data();
                (TabRegistry::new(&font), self.theme, backup)
            }
            // Backend failure: keep saves disabled so defaults never
            // overwrite whatever is still stored.
            Err(e) => (TabRegistry::new(&font), self.theme, Err(e)),
        };

        self.theme = theme;
        self.bridge.apply_theme(theme);
        self.docs = Some(Documents {
            registry,
            closed: ClosedTabStack::new(self.settings.undo_capacity),
        });
        self.show_active_tab();

        load_result?;
        self.data_loaded = true;
        info!("Loaded {} tab(s)", self.tab_count());
        Ok(())
    }

    /// Copy the raw `editorData` value to the backup key.
    fn back_up_unreadable_data(&mut self) -> Result<()> {
        let Some(raw) = self.store.get(EDITOR_DATA_KEY)? else {
            return Ok(());
        };
        write_with_retry(&mut self.store, EDITOR_DATA_BACKUP_KEY, &raw)?;
        info!("Kept unreadable document data under '{}'", EDITOR_DATA_BACKUP_KEY);
        Ok(())
    }

    /// Preferences mirror, falling back to defaults when absent or unreadable.
    fn stored_preferences(&self) -> EditorSettings {
        match read_key::<EditorSettings, _>(&self.store, EDITOR_SETTINGS_KEY) {
            Ok(prefs) => prefs.unwrap_or_default(),
            Err(e) => {
                warn!("{}; using default preferences", e);
                EditorSettings::default()
            }
        }
    }

    /// Copy the visible content into the active tab.
    fn flush_visible(&mut self) {
        if let Some(docs) = self.docs.as_mut() {
            let content = self.bridge.get_content();
            docs.registry.active_tab_mut().content = content;
        }
    }

    /// Push the active tab's content and mode out to the editing surface.
    fn show_active_tab(&mut self) {
        if let Some(docs) = self.docs.as_ref() {
            let tab = docs.registry.active_tab();
            self.bridge
                .set_mode(SurfaceKind::from_code_mode(tab.is_code_mode));
            self.bridge.set_content(&tab.content);
        }
    }

    /// Write `editorData` and `editorSettings` wholesale, ignoring guards.
    fn persist_snapshot(&mut self) -> Result<()> {
        let docs = self.docs.as_ref().ok_or(Error::Locked)?;
        let data = EditorData {
            tabs: docs.registry.tabs().to_vec(),
            active_tab_id: docs.registry.active_tab_id(),
            theme: self.theme,
            timestamp: Utc::now(),
        };
        let prefs = EditorSettings {
            theme: self.theme,
            is_code_mode: docs.registry.active_tab().is_code_mode,
        };

        write_with_retry(&mut self.store, EDITOR_DATA_KEY, &data)?;
        write_with_retry(&mut self.store, EDITOR_SETTINGS_KEY, &prefs)?;
        debug!("Persisted snapshot of {} tab(s)", data.tabs.len());
        Ok(())
    }

    /// Flush and persist, unless the initial load has not completed or the
    /// editor is locked. Returns whether anything was written.
    pub fn save(&mut self) -> Result<bool> {
        if !self.data_loaded || self.gate.is_locked() || self.docs.is_none() {
            debug!("Save skipped (loaded: {}, locked: {})", self.data_loaded, self.gate.is_locked());
            return Ok(false);
        }
        self.flush_visible();
        self.persist_snapshot()?;
        Ok(true)
    }

    /// Save after a structural change; failures become warnings.
    fn save_after_change(&mut self) {
        if !self.data_loaded && self.docs.is_some() {
            self.edited_before_load = true;
        }
        self.autosave.cancel();
        if let Err(e) = self.save() {
            warn!("{}", e);
            self.warnings.push(e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Autosave
    // ─────────────────────────────────────────────────────────────────────────

    /// Note an edit of the visible content; restarts the autosave countdown.
    pub fn content_changed(&mut self, now: Instant) {
        if self.gate.is_locked() || self.docs.is_none() {
            return;
        }
        if self.data_loaded {
            self.autosave.content_changed(now);
        } else {
            self.edited_before_load = true;
        }
    }

    /// Drive the autosave scheduler. Returns `true` if a save happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.autosave.poll(now) {
            return false;
        }
        match self.save() {
            Ok(true) => {
                self.autosave.show_indicator(now);
                true
            }
            Ok(false) => false,
            Err(e) => {
                warn!("Autosave failed: {}", e);
                self.warnings.push(e);
                false
            }
        }
    }

    /// Save immediately, skipping the debounce.
    pub fn save_now(&mut self, now: Instant) -> Result<bool> {
        self.autosave.cancel();
        let saved = self.save()?;
        if saved {
            self.autosave.show_indicator(now);
        }
        Ok(saved)
    }

    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.autosave.indicator_visible(now)
    }

    pub fn autosave_pending(&self) -> bool {
        self.autosave.is_pending()
    }

    /// How long the UI may idle before `tick` needs to run again.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.autosave.next_wakeup(now)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Commands
    // ─────────────────────────────────────────────────────────────────────────

    fn docs(&self) -> Result<&Documents> {
        self.docs.as_ref().ok_or(Error::Locked)
    }

    fn docs_mut(&mut self) -> Result<&mut Documents> {
        self.docs.as_mut().ok_or(Error::Locked)
    }

    /// Open a new empty tab and make it active.
    pub fn create_tab(&mut self) -> Result<u64> {
        self.docs()?;
        self.flush_visible();
        let font = self.settings.default_font.clone();
        let id = self.docs_mut()?.registry.create_tab(&font);
        self.show_active_tab();
        self.save_after_change();
        Ok(id)
    }

    /// Close a tab, keeping it in the closed-tab history.
    ///
    /// Closing the last tab is rejected with `Validation`; unknown ids are
    /// ignored.
    pub fn close_tab(&mut self, id: u64) -> Result<()> {
        self.docs()?;
        self.flush_visible();

        let docs = self.docs_mut()?;
        let was_active = docs.registry.active_tab_id() == id;
        let Some((tab, index)) = docs.registry.remove_tab(id)? else {
            return Ok(());
        };
        docs.closed.push(tab, index);

        if was_active {
            self.show_active_tab();
        }
        self.save_after_change();
        Ok(())
    }

    /// Make `id` active. Returns `false` for unknown ids.
    ///
    /// The outgoing tab's visible content is flushed and persisted before
    /// the switch, and the new active id is persisted after it.
    pub fn switch_tab(&mut self, id: u64) -> Result<bool> {
        if !self.docs()?.registry.contains(id) {
            return Ok(false);
        }
        if self.docs()?.registry.active_tab_id() == id {
            return Ok(true);
        }

        self.flush_visible();
        self.save_after_change();

        self.docs_mut()?.registry.activate(id);
        self.show_active_tab();
        self.save_after_change();
        debug!("Switched to tab {}", id);
        Ok(true)
    }

    /// Reopen the most recently closed tab at its old position.
    pub fn restore_last_closed(&mut self) -> Result<Option<u64>> {
        if self.docs()?.closed.is_empty() {
            return Ok(None);
        }
        self.flush_visible();

        let docs = self.docs_mut()?;
        let Some(entry) = docs.closed.pop() else {
            return Ok(None);
        };
        docs.registry.insert_tab(entry.tab, entry.index);
        let id = docs.registry.active_tab_id();

        self.show_active_tab();
        self.save_after_change();
        debug!("Restored tab {}", id);
        Ok(Some(id))
    }

    pub fn rename_tab(&mut self, id: u64, name: &str, now: Instant) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("Tab name cannot be empty".to_string()));
        }
        let Some(tab) = self.docs_mut()?.registry.get_mut(id) else {
            return Ok(());
        };
        tab.name = name.to_string();
        self.content_changed(now);
        Ok(())
    }

    /// Change the active tab's font.
    pub fn set_font(&mut self, font: &str, now: Instant) -> Result<()> {
        self.docs_mut()?.registry.active_tab_mut().font = font.to_string();
        self.content_changed(now);
        Ok(())
    }

    /// Switch the active tab between the text and code surfaces.
    pub fn set_code_mode(&mut self, is_code_mode: bool, now: Instant) -> Result<()> {
        self.docs()?;
        self.flush_visible();
        self.docs_mut()?.registry.active_tab_mut().is_code_mode = is_code_mode;
        self.bridge
            .set_mode(SurfaceKind::from_code_mode(is_code_mode));
        self.content_changed(now);
        Ok(())
    }

    pub fn toggle_code_mode(&mut self, now: Instant) -> Result<bool> {
        let is_code_mode = !self.mode().is_code();
        self.set_code_mode(is_code_mode, now)?;
        Ok(is_code_mode)
    }

    /// Flip the UI theme and persist it.
    ///
    /// While locked only `editorSettings` is rewritten; document data is
    /// left as it was at lock time.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.bridge.apply_theme(self.theme);

        if self.docs.is_some() && self.data_loaded {
            self.save_after_change();
        } else {
            let prefs = EditorSettings {
                theme: self.theme,
                ..self.stored_preferences()
            };
            if let Err(e) = write_with_retry(&mut self.store, EDITOR_SETTINGS_KEY, &prefs) {
                warn!("{}", e);
                self.warnings.push(e);
            }
        }
        self.theme
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lock Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the first password. The editor stays unlocked.
    pub fn set_password(&mut self, password: &str, confirm: &str) -> Result<()> {
        let hash = self
            .gate
            .prepare_password(password, confirm, self.settings.min_password_len)?;
        write_with_retry(&mut self.store, PASSWORD_HASH_KEY, &hash)?;
        write_with_retry(&mut self.store, IS_LOCKED_KEY, &false)?;
        self.gate.mark_password_set(hash);
        Ok(())
    }

    /// Lock the editor.
    ///
    /// The visible content is written to the store and `isLocked` is set
    /// before anything is hidden. If either write fails the editor stays
    /// unlocked and the error is returned. Placeholder documents from a
    /// failed load are only written if the user changed them.
    pub fn lock(&mut self) -> Result<()> {
        self.gate.check_can_lock()?;
        self.autosave.cancel();

        if self.docs.is_some() && (self.data_loaded || self.edited_before_load) {
            self.flush_visible();
            self.persist_snapshot()?;
        } else {
            debug!("Documents were never loaded, leaving stored data untouched");
        }
        write_with_retry(&mut self.store, IS_LOCKED_KEY, &true)?;

        self.gate.mark_locked();
        self.docs = None;
        self.bridge.unmount();
        self.data_loaded = false;
        self.edited_before_load = false;
        Ok(())
    }

    /// Unlock with `password` and reload documents from the store.
    ///
    /// A wrong password returns `Auth` and leaves the editor locked.
    pub fn unlock(&mut self, password: &str) -> Result<()> {
        self.gate.check_unlock(password)?;
        write_with_retry(&mut self.store, IS_LOCKED_KEY, &false)?;
        self.gate.mark_unlocked();
        self.load()
    }

    /// Remove the password after verifying it.
    pub fn remove_password(&mut self, password: &str) -> Result<()> {
        self.gate.check_remove(password)?;
        self.store.remove(PASSWORD_HASH_KEY)?;
        self.store.remove(IS_LOCKED_KEY)?;
        self.gate.mark_password_removed();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn lock_state(&self) -> LockState {
        self.gate.state()
    }

    pub fn has_password(&self) -> bool {
        self.gate.has_password()
    }

    pub fn data_loaded(&self) -> bool {
        self.data_loaded
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tabs(&self) -> Result<&[Tab]> {
        Ok(self.docs()?.registry.tabs())
    }

    pub fn tab_count(&self) -> usize {
        self.docs.as_ref().map_or(0, |docs| docs.registry.len())
    }

    pub fn active_tab(&self) -> Result<&Tab> {
        Ok(self.docs()?.registry.active_tab())
    }

    pub fn active_tab_id(&self) -> Result<u64> {
        Ok(self.docs()?.registry.active_tab_id())
    }

    /// Live buffer of the mounted surface, for binding the editor widget.
    pub fn editor_buffer_mut(&mut self) -> Result<&mut String> {
        self.docs()?;
        Ok(self.bridge.buffer_mut())
    }

    /// Content currently visible in the editor.
    pub fn visible_content(&mut self) -> Result<String> {
        self.docs()?;
        Ok(self.bridge.get_content())
    }

    pub fn mode(&self) -> SurfaceKind {
        self.bridge.mode()
    }

    /// Palette used to colour code; always the opposite of the UI theme.
    pub fn code_palette(&self) -> CodePalette {
        CodePalette::contrasting(self.theme)
    }

    /// Title of the tab `restore_last_closed` would bring back.
    pub fn last_closed_title(&self) -> Option<String> {
        self.docs
            .as_ref()
            .and_then(|docs| docs.closed.peek())
            .map(|closed| closed.tab.title())
    }

    pub fn can_restore(&self) -> bool {
        self.docs
            .as_ref()
            .is_some_and(|docs| !docs.closed.is_empty())
    }

    /// Drain warnings collected since the last call.
    pub fn take_warnings(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.warnings)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::lock::hash_password;
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn open(store: MemoryStore) -> Session<MemoryStore> {
        Session::open(store, Settings::default()).unwrap()
    }

    fn stored_data(session: &Session<MemoryStore>) -> EditorData {
        read_key::<StoredEditorData, _>(session.store(), EDITOR_DATA_KEY)
            .unwrap()
            .unwrap()
            .into_current("")
    }

    fn type_text(session: &mut Session<MemoryStore>, text: &str) {
        let buffer = session.editor_buffer_mut().unwrap();
        buffer.clear();
        buffer.push_str(text);
    }

    fn with_password(password: &str) -> Session<MemoryStore> {
        let mut session = open(MemoryStore::new());
        session.set_password(password, password).unwrap();
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fresh_store_opens_one_tab() {
        let session = open(MemoryStore::new());
        assert_eq!(session.tabs().unwrap().len(), 1);
        assert_eq!(session.lock_state(), LockState::NoPassword);
        assert!(session.data_loaded());
        assert_eq!(session.store().write_count(), 0);
    }

    #[test]
    fn test_hydrates_stored_snapshot() {
        let mut store = MemoryStore::new();
        store
            .set(
                EDITOR_DATA_KEY,
                json!({
                    "tabs": [
                        {"id": 0, "name": "One", "content": "first", "font": "serif", "isCodeMode": false},
                        {"id": 5, "name": "Two", "content": "fn main() {}", "font": "serif", "isCodeMode": true}
                    ],
                    "activeTabId": 5,
                    "theme": "dark",
                    "timestamp": "2024-05-01T10:00:00Z"
                }),
            )
            .unwrap();

        let mut session = open(store);
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.active_tab_id().unwrap(), 5);
        assert_eq!(session.mode(), SurfaceKind::Code);
        assert_eq!(session.visible_content().unwrap(), "fn main() {}");
        assert_eq!(session.code_palette(), CodePalette::Light);
    }

    #[test]
    fn test_migrates_legacy_document() {
        let mut store = MemoryStore::new();
        store
            .set(
                EDITOR_DATA_KEY,
                json!({"content": "old note", "font": "serif", "theme": "dark", "isCodeMode": false}),
            )
            .unwrap();

        let mut session = open(store);
        assert_eq!(session.tabs().unwrap().len(), 1);
        assert_eq!(session.visible_content().unwrap(), "old note");
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn test_preferences_used_without_document_data() {
        let mut store = MemoryStore::new();
        store
            .set(EDITOR_SETTINGS_KEY, json!({"theme": "dark", "isCodeMode": true}))
            .unwrap();

        let session = open(store);
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.mode(), SurfaceKind::Code);
    }

    #[test]
    fn test_malformed_data_starts_fresh_with_warning() {
        let mut store = MemoryStore::new();
        store.set(EDITOR_DATA_KEY, json!({"foo": 1})).unwrap();

        let mut session = open(store);
        assert_eq!(session.tabs().unwrap().len(), 1);
        let warnings = session.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(session.take_warnings().is_empty());
    }

    fn snapshot_with_nameless_tab() -> serde_json::Value {
        json!({
            "tabs": [
                {"id": 0, "name": "Notes", "content": "precious notes", "font": "serif", "isCodeMode": false},
                {"id": 1, "content": "second", "font": "serif", "isCodeMode": false}
            ],
            "activeTabId": 0,
            "theme": "light",
            "timestamp": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn test_unreadable_snapshot_is_backed_up_before_saving() {
        let t0 = Instant::now();
        let mut store = MemoryStore::new();
        store.set(EDITOR_DATA_KEY, snapshot_with_nameless_tab()).unwrap();

        let mut session = open(store);
        assert!(session.data_loaded());
        let backup = session.store().get(EDITOR_DATA_BACKUP_KEY).unwrap();
        assert_eq!(backup, Some(snapshot_with_nameless_tab()));

        session.content_changed(t0);
        assert!(session.tick(t0 + ms(1000)));
        let backup = session.store().get(EDITOR_DATA_BACKUP_KEY).unwrap();
        assert_eq!(backup, Some(snapshot_with_nameless_tab()));
    }

    #[test]
    fn test_failed_backup_keeps_saves_disabled() {
        let t0 = Instant::now();
        let mut store = MemoryStore::new();
        store.set(EDITOR_DATA_KEY, snapshot_with_nameless_tab()).unwrap();
        store.fail_next_writes(2);

        let mut session = open(store);
        assert!(!session.data_loaded());
        assert_eq!(session.take_warnings().len(), 2);

        type_text(&mut session, "typed");
        session.content_changed(t0);
        assert!(!session.tick(t0 + ms(5000)));
        assert!(!session.save().unwrap());
        let stored = session.store().get(EDITOR_DATA_KEY).unwrap();
        assert_eq!(stored, Some(snapshot_with_nameless_tab()));
    }

    #[test]
    fn test_tab_id_at_end_of_range_is_renumbered() {
        let mut store = MemoryStore::new();
        store
            .set(
                EDITOR_DATA_KEY,
                json!({
                    "tabs": [{"id": u64::MAX, "name": "Max", "content": "kept", "font": "serif", "isCodeMode": false}],
                    "activeTabId": u64::MAX,
                    "theme": "light",
                    "timestamp": "2024-05-01T10:00:00Z"
                }),
            )
            .unwrap();

        let mut session = open(store);
        assert_eq!(session.active_tab_id().unwrap(), 0);
        assert_eq!(session.visible_content().unwrap(), "kept");
        assert_eq!(session.create_tab().unwrap(), 1);
    }

    fn unlocked_store_with_document(content: &str) -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .set(PASSWORD_HASH_KEY, json!(hash_password("abcd")))
            .unwrap();
        store.set(IS_LOCKED_KEY, json!(false)).unwrap();
        store
            .set(
                EDITOR_DATA_KEY,
                json!({
                    "tabs": [{"id": 0, "name": "Notes", "content": content, "font": "serif", "isCodeMode": false}],
                    "activeTabId": 0,
                    "theme": "light",
                    "timestamp": "2024-05-01T10:00:00Z"
                }),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_lock_after_failed_read_leaves_document_untouched() {
        let mut store = unlocked_store_with_document("precious notes");
        store.fail_reads_of(EDITOR_DATA_KEY);

        let mut session = open(store);
        assert!(!session.data_loaded());
        assert_eq!(session.take_warnings().len(), 1);

        session.lock().unwrap();
        session.store_mut().clear_read_failures();
        assert_eq!(stored_data(&session).tabs[0].content, "precious notes");

        session.unlock("abcd").unwrap();
        assert_eq!(session.visible_content().unwrap(), "precious notes");
    }

    #[test]
    fn test_lock_after_failed_read_keeps_new_typing() {
        let t0 = Instant::now();
        let mut store = unlocked_store_with_document("precious notes");
        store.fail_reads_of(EDITOR_DATA_KEY);

        let mut session = open(store);
        type_text(&mut session, "written after the failed load");
        session.content_changed(t0);

        session.lock().unwrap();
        session.store_mut().clear_read_failures();
        assert_eq!(
            stored_data(&session).tabs[0].content,
            "written after the failed load"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_create_tab_persists_previous_content() {
        let mut store = MemoryStore::new();
        store
            .set(
                EDITOR_DATA_KEY,
                json!({"tabs": [{"id": 0, "name": "Tab 1", "content": "A"}], "activeTabId": 0}),
            )
            .unwrap();
        let mut session = open(store);

        type_text(&mut session, "AB");
        let id = session.create_tab().unwrap();
        assert_eq!(id, 1);

        let data = stored_data(&session);
        assert_eq!(data.tabs.len(), 2);
        assert_eq!(data.tabs[0].content, "AB");
        assert_eq!(data.tabs[1].id, 1);
        assert_eq!(data.tabs[1].content, "");
        assert_eq!(data.active_tab_id, 1);
        assert_eq!(session.visible_content().unwrap(), "");
    }

    #[test]
    fn test_switch_tab_flushes_and_persists() {
        let mut session = open(MemoryStore::new());
        type_text(&mut session, "zero");
        session.create_tab().unwrap();
        type_text(&mut session, "one");

        assert!(session.switch_tab(0).unwrap());
        let data = stored_data(&session);
        assert_eq!(data.active_tab_id, 0);
        assert_eq!(data.tabs[1].content, "one");
        assert_eq!(session.visible_content().unwrap(), "zero");
    }

    #[test]
    fn test_switch_to_unknown_tab_is_noop() {
        let mut session = open(MemoryStore::new());
        assert!(!session.switch_tab(42).unwrap());
        assert_eq!(session.active_tab_id().unwrap(), 0);
    }

    #[test]
    fn test_closing_last_tab_is_rejected() {
        let mut session = open(MemoryStore::new());
        let result = session.close_tab(0);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(session.tabs().unwrap().len(), 1);
        assert!(!session.can_restore());
    }

    #[test]
    fn test_close_then_restore_round_trip() {
        let mut session = open(MemoryStore::new());
        session.create_tab().unwrap();
        type_text(&mut session, "middle");
        session.create_tab().unwrap();
        session.switch_tab(1).unwrap();

        session.close_tab(1).unwrap();
        assert_eq!(session.active_tab_id().unwrap(), 0);
        assert!(session.can_restore());

        let restored = session.restore_last_closed().unwrap();
        assert_eq!(restored, Some(1));
        let ids: Vec<u64> = session.tabs().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(session.visible_content().unwrap(), "middle");
        assert_eq!(session.restore_last_closed().unwrap(), None);
    }

    #[test]
    fn test_rename_and_font_schedule_autosave() {
        let t0 = Instant::now();
        let mut session = open(MemoryStore::new());

        assert!(matches!(
            session.rename_tab(0, "   ", t0),
            Err(Error::Validation(_))
        ));
        session.rename_tab(0, " Notes ", t0).unwrap();
        session.set_font("serif", t0).unwrap();
        assert!(session.autosave_pending());

        assert!(session.tick(t0 + ms(1000)));
        let data = stored_data(&session);
        assert_eq!(data.tabs[0].name, "Notes");
        assert_eq!(data.tabs[0].font, "serif");
    }

    #[test]
    fn test_code_mode_keeps_content() {
        let t0 = Instant::now();
        let mut session = open(MemoryStore::new());
        type_text(&mut session, "let x = 1;\n");

        assert!(session.toggle_code_mode(t0).unwrap());
        assert_eq!(session.mode(), SurfaceKind::Code);
        assert_eq!(session.visible_content().unwrap(), "let x = 1;\n");

        assert!(!session.toggle_code_mode(t0).unwrap());
        assert_eq!(session.visible_content().unwrap(), "let x = 1;\n");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Autosave
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_autosave_fires_after_quiet_interval() {
        let t0 = Instant::now();
        let mut session = open(MemoryStore::new());

        type_text(&mut session, "draft");
        session.content_changed(t0);
        assert!(!session.tick(t0 + ms(999)));
        assert!(!session.store().contains(EDITOR_DATA_KEY));

        assert!(session.tick(t0 + ms(1000)));
        assert_eq!(stored_data(&session).tabs[0].content, "draft");
        assert!(session.indicator_visible(t0 + ms(1000)));
        assert!(!session.indicator_visible(t0 + ms(3000)));
    }

    #[test]
    fn test_write_failure_is_retried_once() {
        let t0 = Instant::now();
        let mut session = open(MemoryStore::new());
        type_text(&mut session, "x");

        session.store_mut().fail_next_writes(1);
        assert!(session.save_now(t0).unwrap());
        assert_eq!(stored_data(&session).tabs[0].content, "x");
    }

    #[test]
    fn test_persistent_write_failure_becomes_warning() {
        let t0 = Instant::now();
        let mut session = open(MemoryStore::new());
        type_text(&mut session, "keep");
        session.content_changed(t0);

        session.store_mut().fail_next_writes(2);
        assert!(!session.tick(t0 + ms(1000)));

        let warnings = session.take_warnings();
        assert!(matches!(warnings[0], Error::PersistenceWrite { .. }));
        assert!(warnings[0].is_warning());
        assert_eq!(session.visible_content().unwrap(), "keep");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lock
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_password_rules() {
        let mut session = open(MemoryStore::new());
        assert!(session.set_password("abc", "abc").is_err());
        assert!(session.set_password("abcd", "abce").is_err());
        assert_eq!(session.lock_state(), LockState::NoPassword);

        session.set_password("abcd", "abcd").unwrap();
        assert_eq!(session.lock_state(), LockState::Unlocked);
        let stored: Option<String> = read_key(session.store(), PASSWORD_HASH_KEY).unwrap();
        assert_eq!(stored, Some(hash_password("abcd")));
    }

    #[test]
    fn test_lock_force_flushes_unsaved_content() {
        let t0 = Instant::now();
        let mut session = with_password("abcd");
        type_text(&mut session, "unsaved edit");
        session.content_changed(t0);

        session.lock().unwrap();
        assert_eq!(stored_data(&session).tabs[0].content, "unsaved edit");
        let locked: Option<bool> = read_key(session.store(), IS_LOCKED_KEY).unwrap();
        assert_eq!(locked, Some(true));

        // The pending autosave was cancelled and nothing is reachable.
        assert!(!session.tick(t0 + ms(5000)));
        assert!(matches!(session.tabs(), Err(Error::Locked)));
        assert!(matches!(session.visible_content(), Err(Error::Locked)));
        assert!(session.editor_buffer_mut().is_err());
        assert!(!session.can_restore());
    }

    #[test]
    fn test_failed_lock_write_keeps_editor_unlocked() {
        let mut session = with_password("abcd");
        type_text(&mut session, "text");

        session.store_mut().fail_next_writes(2);
        assert!(session.lock().is_err());
        assert_eq!(session.lock_state(), LockState::Unlocked);
        assert_eq!(session.visible_content().unwrap(), "text");
    }

    #[test]
    fn test_nothing_saves_while_locked() {
        let t0 = Instant::now();
        let mut session = with_password("abcd");
        session.lock().unwrap();
        let writes = session.store().write_count();

        session.content_changed(t0);
        assert!(!session.tick(t0 + ms(2000)));
        assert!(!session.save().unwrap());
        assert!(matches!(session.create_tab(), Err(Error::Locked)));
        assert_eq!(session.store().write_count(), writes);
    }

    #[test]
    fn test_unlock_rehydrates_from_store() {
        let mut session = with_password("abcd");
        type_text(&mut session, "before");
        session.lock().unwrap();

        assert!(matches!(session.unlock("wrong"), Err(Error::Auth(_))));
        assert_eq!(session.lock_state(), LockState::Locked);

        session
            .store_mut()
            .set(
                EDITOR_DATA_KEY,
                json!({"tabs": [{"id": 3, "name": "Other", "content": "after"}], "activeTabId": 3}),
            )
            .unwrap();

        session.unlock("abcd").unwrap();
        assert_eq!(session.lock_state(), LockState::Unlocked);
        assert!(session.data_loaded());
        assert_eq!(session.active_tab_id().unwrap(), 3);
        assert_eq!(session.visible_content().unwrap(), "after");
    }

    #[test]
    fn test_reopen_while_locked_defers_loading() {
        let mut session = with_password("abcd");
        type_text(&mut session, "hidden");
        session.lock().unwrap();
        let store = session.store().clone();

        let mut reopened = open(store);
        assert_eq!(reopened.lock_state(), LockState::Locked);
        assert!(!reopened.data_loaded());
        assert!(reopened.tabs().is_err());

        reopened.unlock("abcd").unwrap();
        assert_eq!(reopened.visible_content().unwrap(), "hidden");
    }

    #[test]
    fn test_theme_toggle_while_locked_only_touches_preferences() {
        let mut store = MemoryStore::new();
        store
            .set(EDITOR_SETTINGS_KEY, json!({"theme": "light", "isCodeMode": true}))
            .unwrap();
        let mut session = open(store);
        session.set_password("abcd", "abcd").unwrap();
        session.lock().unwrap();
        let before = stored_data(&session);

        assert_eq!(session.toggle_theme(), Theme::Dark);
        let prefs: EditorSettings = read_key(session.store(), EDITOR_SETTINGS_KEY)
            .unwrap()
            .unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.is_code_mode);
        assert_eq!(stored_data(&session).tabs, before.tabs);
    }

    #[test]
    fn test_remove_password_clears_credentials() {
        let mut session = with_password("abcd");
        assert!(matches!(
            session.remove_password("nope"),
            Err(Error::Auth(_))
        ));

        session.remove_password("abcd").unwrap();
        assert_eq!(session.lock_state(), LockState::NoPassword);
        assert!(!session.store().contains(PASSWORD_HASH_KEY));
        assert!(!session.store().contains(IS_LOCKED_KEY));
        assert!(session.lock().is_err());
    }
}
