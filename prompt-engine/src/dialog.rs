//! Lifecycle of the prompt management dialog.

use prompt_primitives::PromptIndex;
use thiserror::Error;
use tracing::debug;

use crate::filter::{FilterState, Tab, available_tabs};
use crate::node::PromptManagerNode;
use crate::view::{ManagerView, render};

/// States of the management dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Not shown.
    #[default]
    Closed,
    /// Shown and accepting edits.
    Open,
}

/// Events driving dialog transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// Show the dialog.
    Open,
    /// Commit the projection and close.
    Apply,
    /// Close without committing (close button, overlay click, escape).
    Dismiss,
}

/// Errors raised by dialog operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    /// The event is not allowed from the current state.
    #[error("cannot apply {event:?} while dialog is {from:?}")]
    InvalidTransition {
        /// State before the event.
        from: DialogState,
        /// Rejected event.
        event: DialogEvent,
    },
    /// The operation needs an open dialog.
    #[error("dialog is closed")]
    Closed,
}

/// Result alias for dialog operations.
pub type DialogResult<T> = Result<T, DialogError>;

/// Filter state and tab strip of the management dialog.
///
/// The dialog never owns prompt data; every operation borrows the node whose
/// stores it displays.
#[derive(Debug, Clone, Default)]
pub struct ManagerDialog {
    state: DialogState,
    filter: FilterState,
    tabs: Vec<Tab>,
}

impl ManagerDialog {
    /// Creates a closed dialog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> DialogState {
        self.state
    }

    /// Returns `true` while the dialog is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, DialogState::Open)
    }

    /// Returns the active filter.
    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Returns the tab strip.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Applies a lifecycle event, returning the resulting state.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidTransition`] when the event is not allowed
    /// from the current state.
    pub fn transition(&mut self, event: DialogEvent) -> DialogResult<DialogState> {
        let next = match (self.state, event) {
            (DialogState::Closed, DialogEvent::Open) => DialogState::Open,
            (DialogState::Open, DialogEvent::Apply | DialogEvent::Dismiss) => DialogState::Closed,
            (from, event) => return Err(DialogError::InvalidTransition { from, event }),
        };
        debug!(from = ?self.state, to = ?next, ?event, "dialog transition");
        self.state = next;
        Ok(next)
    }

    /// Opens the dialog over freshly loaded stores, resetting the filter.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidTransition`] when already open.
    pub fn open(&mut self, node: &PromptManagerNode) -> DialogResult<ManagerView> {
        self.transition(DialogEvent::Open)?;
        self.filter = FilterState::default();
        self.rebuild_tabs(node);
        Ok(self.render(node))
    }

    /// Rebuilds the tab strip after a store refetch.
    ///
    /// A category tab that no longer exists falls back to `All`.
    pub fn rebuild_tabs(&mut self, node: &PromptManagerNode) {
        self.tabs = available_tabs(node.categories(), node.prompts());
        if !self.tabs.contains(&self.filter.tab) {
            debug!(tab = %self.filter.tab, "active tab vanished, falling back to All");
            self.filter.tab = Tab::All;
        }
    }

    /// Renders the current view.
    #[must_use]
    pub fn render(&self, node: &PromptManagerNode) -> ManagerView {
        render(node.prompts(), &self.tabs, &self.filter, node.selection())
    }

    /// Switches the active tab, e.g. from the tab strip or a category pill.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn set_tab(&mut self, tab: Tab, node: &PromptManagerNode) -> DialogResult<ManagerView> {
        self.ensure_open()?;
        self.filter.tab = tab;
        Ok(self.render(node))
    }

    /// Updates the search text.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn set_search(
        &mut self,
        search: impl Into<String>,
        node: &PromptManagerNode,
    ) -> DialogResult<ManagerView> {
        self.ensure_open()?;
        self.filter.search = search.into();
        Ok(self.render(node))
    }

    /// Flips selection of one record.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn toggle(
        &mut self,
        index: PromptIndex,
        node: &mut PromptManagerNode,
    ) -> DialogResult<ManagerView> {
        self.ensure_open()?;
        node.selection_mut().toggle(index);
        Ok(self.render(node))
    }

    /// Selects every record of the filtered view.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn select_all(&mut self, node: &mut PromptManagerNode) -> DialogResult<ManagerView> {
        self.ensure_open()?;
        node.select_visible(&self.filter);
        Ok(self.render(node))
    }

    /// Clears the whole selection regardless of filter.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn deselect_all(&mut self, node: &mut PromptManagerNode) -> DialogResult<ManagerView> {
        self.ensure_open()?;
        node.selection_mut().deselect_all();
        Ok(self.render(node))
    }

    /// Commits the projection to the node's output and closes.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidTransition`] when the dialog is closed.
    pub fn apply(&mut self, node: &mut PromptManagerNode) -> DialogResult<String> {
        self.transition(DialogEvent::Apply)?;
        Ok(node.apply_output().to_owned())
    }

    /// Closes without committing the projection.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::InvalidTransition`] when the dialog is closed.
    pub fn dismiss(&mut self) -> DialogResult<()> {
        self.transition(DialogEvent::Dismiss).map(|_| ())
    }

    /// Fails with [`DialogError::Closed`] unless the dialog is open.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::Closed`] when the dialog is not open.
    pub fn ensure_open(&self) -> DialogResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(DialogError::Closed)
        }
    }
}
