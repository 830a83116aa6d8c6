//! Pure state → view projection of the management dialog.

use prompt_primitives::{PromptIndex, PromptRecord, routes};
use serde::Serialize;

use crate::filter::{FilterState, Tab, filter_prompts};
use crate::selection::SelectionSet;

/// One entry of the tab strip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabView {
    /// Display label.
    pub label: String,
    /// Whether this tab is the active one.
    pub active: bool,
    #[serde(skip)]
    tab: Tab,
}

impl TabView {
    /// Returns the tab this entry activates.
    #[must_use]
    pub fn tab(&self) -> &Tab {
        &self.tab
    }
}

/// One row of the prompt list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PromptItemView {
    /// Record index.
    pub index: PromptIndex,
    /// Title.
    pub title: String,
    /// Body text.
    pub prompt: String,
    /// Category pills.
    pub categories: Vec<String>,
    /// Favourite star.
    pub favorite: bool,
    /// URL path of the hover preview, when an image is attached.
    pub image_url: Option<String>,
    /// Checked state.
    pub selected: bool,
}

/// Everything needed to draw the dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ManagerView {
    /// Tab strip.
    pub tabs: Vec<TabView>,
    /// Current search text.
    pub search: String,
    /// Filtered prompt rows.
    pub items: Vec<PromptItemView>,
    /// Size of the selection, including members outside the current view.
    pub selected_count: usize,
}

impl ManagerView {
    /// Returns `true` when the filtered list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Renders the dialog view from current state.
#[must_use]
pub fn render(
    prompts: &[PromptRecord],
    tabs: &[Tab],
    filter: &FilterState,
    selection: &SelectionSet,
) -> ManagerView {
    let tabs = tabs
        .iter()
        .map(|tab| TabView {
            label: tab.label().to_owned(),
            active: *tab == filter.tab,
            tab: tab.clone(),
        })
        .collect();

    let items = filter_prompts(prompts, filter)
        .into_iter()
        .map(|record| PromptItemView {
            index: record.index,
            title: record.title.clone(),
            prompt: record.prompt.clone(),
            categories: record.categories.clone(),
            favorite: record.favorite,
            image_url: record.image().map(routes::image_path),
            selected: selection.contains(record.index),
        })
        .collect();

    ManagerView {
        tabs,
        search: filter.search.clone(),
        items,
        selected_count: selection.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt_primitives::NewPrompt;

    #[test]
    fn marks_active_tab_and_checked_rows() {
        let mut with_image = PromptRecord::from_new(
            PromptIndex::new(1),
            NewPrompt::new("one", "body one").with_categories(["poses"]),
        );
        with_image.image = Some("prompt_1.png".into());
        let plain = PromptRecord::from_new(PromptIndex::new(2), NewPrompt::new("two", "body two"));
        let prompts = vec![with_image, plain];

        let tabs = vec![Tab::All, Tab::Favorites, Tab::category("poses")];
        let filter = FilterState::new(Tab::category("poses"));
        let selection: SelectionSet = [PromptIndex::new(1), PromptIndex::new(9)]
            .into_iter()
            .collect();

        let view = render(&prompts, &tabs, &filter, &selection);

        let active: Vec<&str> = view
            .tabs
            .iter()
            .filter(|t| t.active)
            .map(|t| t.label.as_str())
            .collect();
        assert_eq!(active, vec!["poses"]);

        assert_eq!(view.items.len(), 1);
        let row = &view.items[0];
        assert!(row.selected);
        assert_eq!(row.image_url.as_deref(), Some("/prompt_manager/image/prompt_1.png"));
        assert_eq!(view.selected_count, 2);
    }

    #[test]
    fn empty_filter_result_renders_empty_list() {
        let prompts = vec![PromptRecord::from_new(
            PromptIndex::new(1),
            NewPrompt::new("one", "body"),
        )];
        let view = render(
            &prompts,
            &[Tab::All],
            &FilterState::default().with_search("nothing matches"),
            &SelectionSet::new(),
        );
        assert!(view.is_empty());
        assert_eq!(view.search, "nothing matches");
    }
}
