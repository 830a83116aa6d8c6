//! Core shared types for the prompt manager.

#![warn(missing_docs, clippy::pedantic)]

mod category;
mod error;
mod ids;
mod record;
pub mod routes;
pub mod wire;

/// Normalised category labels.
pub use category::CategoryLabel;
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Backend-assigned identifier for prompt records.
pub use ids::PromptIndex;
/// Prompt records and the payload used to create them.
pub use record::{NewPrompt, PromptRecord};
