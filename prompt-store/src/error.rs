//! Error types for the storage layer.

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by the prompt store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure while reading or writing store files.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// A record or payload failed validation.
    #[error("invalid input: {source}")]
    Invalid {
        /// Validation failure from the primitives layer.
        #[from]
        source: prompt_primitives::Error,
    },
    /// The referenced prompt or image does not exist.
    #[error("{what} not found")]
    NotFound {
        /// Description of the missing entity.
        what: String,
    },
    /// The uploaded or requested image was rejected.
    #[error("invalid image: {reason}")]
    InvalidImage {
        /// Human-readable reason.
        reason: String,
    },
}

impl StoreError {
    /// Helper to construct not-found errors.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper to construct image validation errors.
    #[must_use]
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
