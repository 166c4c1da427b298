use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::EmployeeId;

/// Which selector of an allocation slot a flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectorField {
    /// The project picker in the project-name column.
    Project,
    /// The percentage picker (dropdown percentage input only).
    Percentage,
}

/// Key of one dropdown's open flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownKey {
    pub employee: EmployeeId,
    pub slot: usize,
    pub field: SelectorField,
}

impl DropdownKey {
    pub fn new(employee: EmployeeId, slot: usize, field: SelectorField) -> Self {
        Self {
            employee,
            slot,
            field,
        }
    }
}

/// Render-only state that has to survive a full re-projection.
///
/// Only open dropdowns are stored; an absent key reads as closed. A search
/// buffer only exists while its dropdown is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransientUiState {
    open: BTreeSet<DropdownKey>,
    search: BTreeMap<DropdownKey, String>,
}

impl TransientUiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, key: &DropdownKey) -> bool {
        self.open.contains(key)
    }

    /// Set one flag, leaving every other flag untouched.
    ///
    /// Closing a dropdown also drops its search buffer.
    pub fn set_open(&mut self, key: DropdownKey, open: bool) {
        if open {
            self.open.insert(key);
        } else {
            self.search.remove(&key);
            self.open.remove(&key);
        }
    }

    pub fn search(&self, key: &DropdownKey) -> Option<&str> {
        self.search.get(key).map(String::as_str)
    }

    /// Store the search buffer of an open dropdown. Ignored while closed.
    pub fn set_search(&mut self, key: DropdownKey, text: Option<String>) {
        match text {
            Some(text) if self.open.contains(&key) => {
                self.search.insert(key, text);
            }
            _ => {
                self.search.remove(&key);
            }
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn clear(&mut self) {
        self.open.clear();
        self.search.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn key(employee: &str, slot: usize, field: SelectorField) -> DropdownKey {
        DropdownKey::new(EmployeeId::from(employee), slot, field)
    }

    #[test]
    fn test_set_open_touches_one_flag() {
        let mut ui = TransientUiState::new();
        ui.set_open(key("1", 0, SelectorField::Project), true);
        ui.set_open(key("2", 1, SelectorField::Project), true);

        ui.set_open(key("1", 0, SelectorField::Percentage), true);
        assert_eq!(ui.open_count(), 3);

        ui.set_open(key("1", 0, SelectorField::Project), false);
        assert!(!ui.is_open(&key("1", 0, SelectorField::Project)));
        assert!(ui.is_open(&key("1", 0, SelectorField::Percentage)));
        assert!(ui.is_open(&key("2", 1, SelectorField::Project)));
    }

    #[test]
    fn test_search_buffer_follows_open_flag() {
        let mut ui = TransientUiState::new();
        let k = key("1", 0, SelectorField::Project);

        ui.set_search(k.clone(), Some("g".into()));
        assert_eq!(ui.search(&k), None);

        ui.set_open(k.clone(), true);
        ui.set_search(k.clone(), Some("g".into()));
        assert_eq!(ui.search(&k), Some("g"));

        ui.set_open(k.clone(), false);
        assert_eq!(ui.search(&k), None);
    }
}
