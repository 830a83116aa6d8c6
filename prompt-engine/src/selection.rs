//! The set of prompt indices chosen for output.

use std::collections::BTreeSet;

use prompt_primitives::{PromptIndex, PromptRecord};
use serde::{Deserialize, Serialize};

/// Indices selected by the user.
///
/// Members are kept in ascending order and serialise as a plain integer
/// array. Stale members (indices whose record was deleted elsewhere) are
/// tolerated; consumers resolve indices defensively.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet(BTreeSet<PromptIndex>);

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `index`, returning `true` when it is now selected.
    pub fn toggle(&mut self, index: PromptIndex) -> bool {
        if self.0.remove(&index) {
            false
        } else {
            self.0.insert(index);
            true
        }
    }

    /// Adds every record of the current filtered view.
    ///
    /// Existing members outside the view are left untouched.
    pub fn select_all<'a, I>(&mut self, visible: I)
    where
        I: IntoIterator<Item = &'a PromptRecord>,
    {
        self.0.extend(visible.into_iter().map(|record| record.index));
    }

    /// Clears the selection unconditionally.
    pub fn deselect_all(&mut self) {
        self.0.clear();
    }

    /// Removes `index` if present, returning whether it was a member.
    pub fn remove_if_present(&mut self, index: PromptIndex) -> bool {
        self.0.remove(&index)
    }

    /// Returns `true` when `index` is selected.
    #[must_use]
    pub fn contains(&self, index: PromptIndex) -> bool {
        self.0.contains(&index)
    }

    /// Number of selected indices, stale members included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PromptIndex> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<PromptIndex> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = PromptIndex>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<PromptIndex> for SelectionSet {
    fn extend<T: IntoIterator<Item = PromptIndex>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterState, Tab, filter_prompts};
    use prompt_primitives::NewPrompt;

    fn idx(value: u64) -> PromptIndex {
        PromptIndex::new(value)
    }

    fn prompts() -> Vec<PromptRecord> {
        (1..=4)
            .map(|i| {
                PromptRecord::from_new(
                    idx(i),
                    NewPrompt::new(format!("t{i}"), format!("p{i}")).with_favorite(i % 2 == 0),
                )
            })
            .collect()
    }

    #[test]
    fn toggle_twice_restores_original() {
        let mut selection: SelectionSet = [idx(1), idx(3)].into_iter().collect();
        let before = selection.clone();

        assert!(selection.toggle(idx(2)));
        assert!(!selection.toggle(idx(2)));
        assert_eq!(selection, before);

        assert!(!selection.toggle(idx(1)));
        assert!(selection.toggle(idx(1)));
        assert_eq!(selection, before);
    }

    #[test]
    fn select_all_is_filter_scoped_and_additive() {
        let prompts = prompts();
        let mut selection: SelectionSet = [idx(1)].into_iter().collect();

        let favourites = filter_prompts(&prompts, &FilterState::new(Tab::Favorites));
        selection.select_all(favourites);

        let members: Vec<u64> = selection.iter().map(PromptIndex::get).collect();
        assert_eq!(members, vec![1, 2, 4]);
        assert!(!selection.contains(idx(3)));
    }

    #[test]
    fn deselect_all_ignores_filter() {
        let prompts = prompts();
        let mut selection = SelectionSet::new();
        selection.select_all(&prompts);
        assert_eq!(selection.len(), 4);

        selection.deselect_all();
        assert!(selection.is_empty());
    }

    #[test]
    fn remove_if_present_reports_membership() {
        let mut selection: SelectionSet = [idx(5)].into_iter().collect();
        assert!(selection.remove_if_present(idx(5)));
        assert!(!selection.remove_if_present(idx(5)));
    }

    #[test]
    fn serialises_as_sorted_array() {
        let selection: SelectionSet = [idx(3), idx(1), idx(2)].into_iter().collect();
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, "[1,2,3]");

        let back: SelectionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, selection);
    }
}
