//! Shared error definitions for prompt primitives.

use thiserror::Error;

/// Result alias used throughout the prompt manager.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or validating primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A required text field was empty after trimming.
    #[error("{field} cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Category label failed validation.
    #[error("invalid category `{label}`: {reason}")]
    InvalidCategory {
        /// The offending label as supplied.
        label: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Prompt index could not be parsed or has no successor.
    #[error("invalid prompt index `{value}`")]
    InvalidIndex {
        /// The offending input.
        value: String,
    },
}

impl Error {
    /// Convenience constructor for empty-field validation failures.
    #[must_use]
    pub const fn empty_field(field: &'static str) -> Self {
        Self::EmptyField { field }
    }
}
