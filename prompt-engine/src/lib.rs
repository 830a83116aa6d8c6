//! Selection, filtering and editing state for the prompt manager.
//!
//! Everything in this crate is synchronous and free of I/O: the stores are
//! plain vectors owned by a [`PromptManagerNode`], and every view is derived
//! from state by a pure function so it can be tested without a UI.

#![warn(missing_docs, clippy::pedantic)]

pub mod dialog;
pub mod filter;
pub mod node;
pub mod projection;
pub mod selection;
pub mod view;

pub use dialog::{DialogError, DialogEvent, DialogResult, DialogState, ManagerDialog};
pub use filter::{FilterState, Tab, available_tabs, filter_prompts};
pub use node::{NodeSnapshot, OUTPUT_FIELD, PromptManagerNode};
pub use projection::project;
pub use selection::SelectionSet;
pub use view::{ManagerView, PromptItemView, TabView, render};
