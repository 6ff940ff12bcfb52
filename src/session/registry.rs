//! Ordered tab list with an active-tab pointer.
//!
//! The registry always holds at least one tab, tab ids are unique, and the
//! active id always names a tab that exists. Ids come from a monotonically
//! increasing counter and are never handed out twice within a session.

use super::tab::Tab;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct TabRegistry {
    /// All open tabs, in display order
    tabs: Vec<Tab>,
    /// Id of the currently active tab
    active_tab_id: u64,
    /// Next id to assign
    next_id: u64,
}

impl TabRegistry {
    /// Create a registry holding a single empty tab.
    pub fn new(default_font: &str) -> Self {
        let tab = Tab::new(0, default_font);
        Self {
            active_tab_id: tab.id,
            tabs: vec![tab],
            next_id: 1,
        }
    }

    /// Rebuild a registry from stored tabs.
    ///
    /// Duplicate ids are reassigned, blank fonts get `default_font`, an
    /// unknown active id falls back to the first tab, and an empty list
    /// yields a single fresh tab. If the stored ids leave no room for the
    /// counter, every tab is renumbered from 0 in display order.
    pub fn from_tabs(tabs: Vec<Tab>, active_tab_id: u64, default_font: &str) -> Self {
        let Some(max_id) = tabs.iter().map(|t| t.id).max() else {
            return Self::new(default_font);
        };
        // Room for the counter plus one reassignment per duplicate
        if max_id.checked_add(tabs.len() as u64).is_none() {
            return Self::renumbered(tabs, active_tab_id, default_font);
        }
        let mut next_id = max_id + 1;

        let mut seen = HashSet::new();
        let mut hydrated = Vec::with_capacity(tabs.len());

        for mut tab in tabs {
            if !seen.insert(tab.id) {
                warn!("Duplicate stored tab id {}, reassigning to {}", tab.id, next_id);
                tab.id = next_id;
                seen.insert(next_id);
                next_id += 1;
            }
            fill_font(&mut tab, default_font);
            hydrated.push(tab);
        }

        let active_tab_id = if seen.contains(&active_tab_id) {
            active_tab_id
        } else {
            hydrated[0].id
        };

        Self {
            tabs: hydrated,
            active_tab_id,
            next_id,
        }
    }

    /// Assign ids `0..len` in display order, keeping the active tab.
    fn renumbered(mut tabs: Vec<Tab>, active_tab_id: u64, default_font: &str) -> Self {
        warn!("Stored tab ids exhaust the id range, renumbering {} tab(s)", tabs.len());
        let active_index = tabs
            .iter()
            .position(|t| t.id == active_tab_id)
            .unwrap_or(0);
        for (id, tab) in (0u64..).zip(tabs.iter_mut()) {
            tab.id = id;
            fill_font(tab, default_font);
        }
        Self {
            active_tab_id: active_index as u64,
            next_id: tabs.len() as u64,
            tabs,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_tab_id(&self) -> u64 {
        self.active_tab_id
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    /// Index of a tab in display order.
    pub fn position(&self, id: u64) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> &Tab {
        // The active id always names an existing tab
        let index = self.position(self.active_tab_id).unwrap_or(0);
        &self.tabs[index]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        let index = self.position(self.active_tab_id).unwrap_or(0);
        &mut self.tabs[index]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append an empty tab, make it active, and return its id.
    pub fn create_tab(&mut self, font: &str) -> u64 {
        let tab = Tab::new(self.next_id, font);
        self.next_id = self.next_id.saturating_add(1);
        let id = tab.id;
        self.tabs.push(tab);
        self.active_tab_id = id;
        debug!("Created tab {} ({} open)", id, self.tabs.len());
        id
    }

    /// Make `id` active. Returns `false` if no such tab exists.
    pub fn activate(&mut self, id: u64) -> bool {
        if self.contains(id) {
            self.active_tab_id = id;
            true
        } else {
            false
        }
    }

    /// Remove a tab, returning it with its former index.
    ///
    /// Fails with `Validation` when `id` is the last remaining tab. Returns
    /// `Ok(None)` for unknown ids. If the removed tab was active, the tab
    /// before it becomes active, or the first tab when it was first.
    pub fn remove_tab(&mut self, id: u64) -> Result<Option<(Tab, usize)>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        if self.tabs.len() == 1 {
            return Err(Error::Validation("Cannot close the last tab".to_string()));
        }

        let tab = self.tabs.remove(index);
        if self.active_tab_id == id {
            let successor = index.saturating_sub(1);
            self.active_tab_id = self.tabs[successor].id;
        }
        debug!(
            "Removed tab {} from index {}, active is now {}",
            id, index, self.active_tab_id
        );
        Ok(Some((tab, index)))
    }

    /// Insert a tab at `min(index, len)` and make it active.
    ///
    /// Returns the index the tab landed at.
    pub fn insert_tab(&mut self, mut tab: Tab, index: usize) -> usize {
        match tab.id.checked_add(1) {
            Some(after) if !self.contains(tab.id) => self.next_id = self.next_id.max(after),
            _ => {
                warn!("Tab id {} unusable, assigning {}", tab.id, self.next_id);
                tab.id = self.next_id;
                self.next_id = self.next_id.saturating_add(1);
            }
        }

        let index = index.min(self.tabs.len());
        self.active_tab_id = tab.id;
        self.tabs.insert(index, tab);
        index
    }
}

fn fill_font(tab: &mut Tab, default_font: &str) {
    if tab.font.trim().is_empty() {
        tab.font = default_font.to_string();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: &str = "sans-serif";

    fn registry_with(count: usize) -> TabRegistry {
        let mut registry = TabRegistry::new(FONT);
        for _ in 1..count {
            registry.create_tab(FONT);
        }
        registry
    }

    #[test]
    fn test_new_registry_has_one_active_tab() {
        let registry = TabRegistry::new(FONT);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_tab_id(), 0);
        assert_eq!(registry.next_id(), 1);
    }

    #[test]
    fn test_create_tab_assigns_increasing_ids_and_activates() {
        let mut registry = TabRegistry::new(FONT);
        assert_eq!(registry.create_tab(FONT), 1);
        assert_eq!(registry.create_tab(FONT), 2);
        assert_eq!(registry.active_tab_id(), 2);
        assert_eq!(registry.tabs().last().unwrap().id, 2);
    }

    #[test]
    fn test_closing_last_tab_is_rejected() {
        let mut registry = TabRegistry::new(FONT);
        let result = registry.remove_tab(0);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_never_reaches_zero_tabs() {
        let mut registry = registry_with(3);
        for _ in 0..10 {
            let id = registry.active_tab_id();
            let _ = registry.remove_tab(id);
            assert!(registry.len() >= 1);
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_close_active_activates_preceding_tab() {
        let mut registry = registry_with(3);
        registry.activate(2);
        let (tab, index) = registry.remove_tab(2).unwrap().unwrap();
        assert_eq!(tab.id, 2);
        assert_eq!(index, 2);
        assert_eq!(registry.active_tab_id(), 1);
    }

    #[test]
    fn test_close_first_active_activates_new_first() {
        let mut registry = registry_with(3);
        registry.activate(0);
        registry.remove_tab(0).unwrap();
        assert_eq!(registry.active_tab_id(), 1);
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut registry = registry_with(3);
        registry.activate(2);
        registry.remove_tab(0).unwrap();
        assert_eq!(registry.active_tab_id(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut registry = registry_with(2);
        assert!(registry.remove_tab(99).unwrap().is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_activate_unknown_id_is_noop() {
        let mut registry = registry_with(2);
        assert!(!registry.activate(42));
        assert_eq!(registry.active_tab_id(), 1);
    }

    #[test]
    fn test_insert_clamps_index_and_activates() {
        let mut registry = registry_with(2);
        let (tab, _) = registry.remove_tab(0).unwrap().unwrap();
        let landed = registry.insert_tab(tab, 10);
        assert_eq!(landed, 1);
        assert_eq!(registry.active_tab_id(), 0);
    }

    #[test]
    fn test_ids_are_not_reused_after_close() {
        let mut registry = registry_with(3);
        registry.remove_tab(2).unwrap();
        assert_eq!(registry.create_tab(FONT), 3);
    }

    #[test]
    fn test_from_tabs_hydrates_state() {
        let mut a = Tab::new(4, "");
        a.content = "A".to_string();
        let b = Tab::new(7, "serif");
        let registry = TabRegistry::from_tabs(vec![a, b], 7, FONT);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_tab_id(), 7);
        assert_eq!(registry.next_id(), 8);
        assert_eq!(registry.get(4).unwrap().font, FONT);
        assert_eq!(registry.get(4).unwrap().content, "A");
    }

    #[test]
    fn test_from_tabs_repairs_bad_state() {
        let registry = TabRegistry::from_tabs(vec![Tab::new(1, FONT), Tab::new(1, FONT)], 9, FONT);
        assert_eq!(registry.len(), 2);
        assert_ne!(registry.tabs()[0].id, registry.tabs()[1].id);
        assert_eq!(registry.active_tab_id(), 1);

        let empty = TabRegistry::from_tabs(Vec::new(), 3, FONT);
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.active_tab_id(), 0);
    }

    #[test]
    fn test_from_tabs_renumbers_when_ids_exhaust_counter() {
        let mut first = Tab::new(7, FONT);
        first.content = "first".to_string();
        let mut last = Tab::new(u64::MAX, "");
        last.content = "last".to_string();

        let mut registry = TabRegistry::from_tabs(vec![first, last], u64::MAX, FONT);
        let ids: Vec<u64> = registry.tabs().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(registry.active_tab().content, "last");
        assert_eq!(registry.active_tab().font, FONT);
        assert_eq!(registry.next_id(), 2);

        assert_eq!(registry.create_tab(FONT), 2);
    }

    #[test]
    fn test_insert_reassigns_id_at_end_of_range() {
        let mut registry = registry_with(2);
        registry.insert_tab(Tab::new(u64::MAX, FONT), 0);

        assert_eq!(registry.tabs()[0].id, 2);
        assert_eq!(registry.active_tab_id(), 2);
        assert_eq!(registry.next_id(), 3);
    }
}
