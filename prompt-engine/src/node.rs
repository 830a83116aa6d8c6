//! Per-node state owned by a prompt manager node instance.

use prompt_primitives::{CategoryLabel, PromptIndex, PromptRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::{FilterState, filter_prompts};
use crate::projection::project;
use crate::selection::SelectionSet;

/// Name of the host-visible text field receiving the projected output.
pub const OUTPUT_FIELD: &str = "selected_prompts";

/// Persisted node state, written on serialize and read back on configure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Selected prompt indices.
    #[serde(default)]
    pub selected: SelectionSet,
    /// Last committed output text.
    #[serde(default, rename = "selected_prompts")]
    pub output: String,
}

/// State of one prompt manager node.
///
/// Each node owns its stores and selection; nothing is shared between node
/// instances.
#[derive(Clone, Debug, Default)]
pub struct PromptManagerNode {
    prompts: Vec<PromptRecord>,
    categories: Vec<CategoryLabel>,
    selection: SelectionSet,
    output: String,
}

impl PromptManagerNode {
    /// Creates a node with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prompt store.
    #[must_use]
    pub fn prompts(&self) -> &[PromptRecord] {
        &self.prompts
    }

    /// Returns the category store.
    #[must_use]
    pub fn categories(&self) -> &[CategoryLabel] {
        &self.categories
    }

    /// Returns the current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Mutable access to the selection.
    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// Returns the committed output text.
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Looks up a record by index.
    #[must_use]
    pub fn find(&self, index: PromptIndex) -> Option<&PromptRecord> {
        self.prompts.iter().find(|record| record.index == index)
    }

    /// Replaces the prompt store with freshly fetched records.
    pub fn replace_prompts(&mut self, prompts: Vec<PromptRecord>) {
        debug!(count = prompts.len(), "prompt store replaced");
        self.prompts = prompts;
    }

    /// Replaces the category store with freshly fetched labels.
    pub fn replace_categories(&mut self, categories: Vec<CategoryLabel>) {
        debug!(count = categories.len(), "category store replaced");
        self.categories = categories;
    }

    /// Adds every record visible under `filter` to the selection, returning
    /// how many records were visible.
    pub fn select_visible(&mut self, filter: &FilterState) -> usize {
        let visible = filter_prompts(&self.prompts, filter);
        let count = visible.len();
        self.selection.select_all(visible);
        count
    }

    /// Drops `index` from the selection after its record was deleted.
    pub fn forget(&mut self, index: PromptIndex) {
        if self.selection.remove_if_present(index) {
            debug!(%index, "removed deleted prompt from selection");
        }
    }

    /// Recomputes the projection and commits it to the output field.
    pub fn apply_output(&mut self) -> &str {
        self.output = project(&self.selection, &self.prompts);
        debug!(
            selected = self.selection.len(),
            bytes = self.output.len(),
            "output committed"
        );
        &self.output
    }

    /// Captures the state persisted with the host graph.
    #[must_use]
    pub fn serialize(&self) -> NodeSnapshot {
        NodeSnapshot {
            selected: self.selection.clone(),
            output: self.output.clone(),
        }
    }

    /// Restores state from a snapshot.
    ///
    /// When prompts are already loaded the output is recomputed from the
    /// restored selection; otherwise the saved output is kept as-is.
    pub fn configure(&mut self, snapshot: &NodeSnapshot) {
        self.selection = snapshot.selected.clone();
        if self.prompts.is_empty() {
            self.output = snapshot.output.clone();
        } else {
            self.apply_output();
        }
    }

    /// Text of the selection-count badge drawn on the node, if any.
    #[must_use]
    pub fn badge(&self) -> Option<String> {
        (!self.selection.is_empty()).then(|| format!("✓ {}", self.selection.len()))
    }
}
