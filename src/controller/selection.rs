use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::types::ResourceId;

/// What happens to checked rows when the list is fetched again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Keep the ids that are still visible.
    #[default]
    Retain,
    ClearOnReload,
}

/// Ids checked for a bulk action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    ids: BTreeSet<ResourceId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, id: ResourceId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn select_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a ResourceId>) {
        self.ids.extend(visible.into_iter().cloned());
    }

    pub fn remove(&mut self, id: &ResourceId) {
        self.ids.remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|held| held.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.ids.iter()
    }

    /// Applies `policy` against the ids rendered after a reload.
    pub fn reconcile(&mut self, visible: &[&str], policy: SelectionPolicy) {
        match policy {
            SelectionPolicy::Retain => self.ids.retain(|id| visible.contains(&id.as_str())),
            SelectionPolicy::ClearOnReload => self.ids.clear(),
        }
    }
}

impl FromIterator<ResourceId> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = ResourceId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> SelectionSet {
        values
            .iter()
            .map(|value| ResourceId::new(*value).unwrap())
            .collect()
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = SelectionSet::new();
        let id = ResourceId::new("4").unwrap();
        selection.toggle(id.clone());
        assert!(selection.contains("4"));
        selection.toggle(id);
        assert!(selection.is_empty());
    }

    #[test]
    fn retain_keeps_only_visible_ids() {
        let mut selection = ids(&["1", "2", "9"]);
        selection.reconcile(&["1", "2", "3"], SelectionPolicy::Retain);
        assert_eq!(selection, ids(&["1", "2"]));
    }

    #[test]
    fn clear_on_reload_empties_selection() {
        let mut selection = ids(&["1"]);
        selection.reconcile(&["1"], SelectionPolicy::ClearOnReload);
        assert!(selection.is_empty());
    }
}
