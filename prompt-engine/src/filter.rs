//! Tab and search filtering over the prompt store.

use std::collections::BTreeSet;
use std::fmt;

use prompt_primitives::{CategoryLabel, PromptRecord};

/// Label of the unfiltered tab.
pub const ALL_LABEL: &str = "All";
/// Label of the favourites tab.
pub const FAVORITES_LABEL: &str = "Favorites";

/// A named filter view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Every record.
    #[default]
    All,
    /// Records flagged as favourite.
    Favorites,
    /// Records carrying the given category label (exact match).
    Category(String),
}

impl Tab {
    /// Creates a category tab.
    #[must_use]
    pub fn category(label: impl Into<String>) -> Self {
        Self::Category(label.into())
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_LABEL,
            Self::Favorites => FAVORITES_LABEL,
            Self::Category(label) => label.as_str(),
        }
    }

    /// Returns `true` when the record passes this tab's predicate.
    #[must_use]
    pub fn admits(&self, record: &PromptRecord) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => record.favorite,
            Self::Category(label) => record.has_category(label),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transient filter settings of the management dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Active tab.
    pub tab: Tab,
    /// Free-text search; empty disables searching.
    pub search: String,
}

impl FilterState {
    /// Creates a filter for the given tab with no search text.
    #[must_use]
    pub fn new(tab: Tab) -> Self {
        Self {
            tab,
            search: String::new(),
        }
    }

    /// Sets the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Applies the tab predicate, then narrows by search text.
///
/// The result preserves the relative order of `prompts`.
#[must_use]
pub fn filter_prompts<'a>(prompts: &'a [PromptRecord], state: &FilterState) -> Vec<&'a PromptRecord> {
    let needle = state.search.to_lowercase();
    prompts
        .iter()
        .filter(|record| state.tab.admits(record))
        .filter(|record| needle.is_empty() || record.matches_lowercase(&needle))
        .collect()
}

/// Builds the tab strip: `All`, `Favorites`, then every category label known
/// to the category store or referenced by a record, de-duplicated and sorted.
#[must_use]
pub fn available_tabs(categories: &[CategoryLabel], prompts: &[PromptRecord]) -> Vec<Tab> {
    let labels: BTreeSet<&str> = categories
        .iter()
        .map(CategoryLabel::as_str)
        .chain(
            prompts
                .iter()
                .flat_map(|record| record.categories.iter().map(String::as_str)),
        )
        .filter(|label| !label.is_empty())
        .collect();

    [Tab::All, Tab::Favorites]
        .into_iter()
        .chain(labels.into_iter().map(Tab::category))
        .collect()
}
