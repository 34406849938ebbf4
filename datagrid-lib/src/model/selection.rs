//! Row selection state.
//!
//! Selection is keyed by row id rather than position so that it survives
//! sorting, filtering and paging.

use std::collections::HashSet;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Rows cannot be selected.
    None,
    /// At most one row.
    Single,
    /// Any number of rows.
    #[default]
    Multiple,
}

/// ID-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        self.selected.drain().collect()
    }

    /// Select a single ID, clearing all others.
    pub fn select_only(&mut self, id: &str) {
        self.selected.clear();
        self.selected.insert(id.to_string());
    }

    /// Add an ID to the selection. Returns `true` if it was not selected.
    pub fn insert(&mut self, id: &str) -> bool {
        self.selected.insert(id.to_string())
    }

    /// Remove an ID from the selection. Returns `true` if it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        self.selected.remove(id)
    }

    /// Toggle selection of an ID (Ctrl+click behavior).
    /// Returns `true` if the ID is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    /// Select all items from the provided list of IDs.
    /// Returns the IDs that were newly selected.
    pub fn select_all(&mut self, ids: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for id in ids {
            if self.selected.insert(id.clone()) {
                added.push(id.clone());
            }
        }
        added
    }

    /// Deselect all items from the provided list of IDs.
    pub fn deselect_all(&mut self, ids: &[String]) {
        for id in ids {
            self.selected.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(selection.is_selected("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_reports_added() {
        let mut selection = Selection::new();
        selection.insert("b");
        let added = selection.select_all(&["a".into(), "b".into(), "c".into()]);
        assert_eq!(added, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(selection.len(), 3);
        assert!(["a", "b", "c"].iter().all(|id| selection.is_selected(id)));
    }

    #[test]
    fn test_clear_returns_removed() {
        let mut selection = Selection::new();
        selection.select_only("x");
        selection.select_only("y");
        assert_eq!(selection.clear(), vec!["y".to_string()]);
        assert!(selection.is_empty());
    }
}
