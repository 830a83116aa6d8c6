//! File-backed storage for the prompt manager backend.
//!
//! Prompts are kept in a line-oriented text file, categories in a JSON array
//! and preview images as individual files in a sibling directory.

#![warn(missing_docs, clippy::pedantic)]

pub mod codec;
mod error;
pub mod images;
mod store;

pub use error::{StoreError, StoreResult};
pub use images::ImageKind;
pub use store::{DEFAULT_CATEGORIES, PromptStore, StoreConfig};
