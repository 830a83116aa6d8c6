//! Errors surfaced by the session.

use prompt_engine::DialogError;
use prompt_gateway::GatewayError;
use prompt_primitives::PromptIndex;
use thiserror::Error;

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Failures raised by [`ManagerSession`](crate::ManagerSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// User input was rejected before reaching the backend.
    #[error("validation failed: {0}")]
    Validation(#[from] prompt_primitives::Error),

    /// The backend call failed.
    #[error("backend call failed: {0}")]
    Gateway(#[from] GatewayError),

    /// The operation needs the dialog to be open.
    #[error("the prompt manager dialog is closed")]
    DialogClosed,

    /// The dialog cannot move to the requested state.
    #[error(transparent)]
    Dialog(DialogError),

    /// The record is not in the loaded prompt list.
    #[error("prompt {index} is not loaded")]
    UnknownPrompt {
        /// Index that was looked up.
        index: PromptIndex,
    },

    /// The user declined the confirmation prompt.
    #[error("operation cancelled by user")]
    Cancelled,
}

impl From<DialogError> for SessionError {
    fn from(err: DialogError) -> Self {
        match err {
            DialogError::Closed => Self::DialogClosed,
            other => Self::Dialog(other),
        }
    }
}
