//! Prompt manager session.
//!
//! [`ManagerSession`] is the single owner of the node state and the dialog. It
//! drives a [`PromptGateway`](prompt_gateway::PromptGateway) for every
//! mutation and follows each successful one with a refetch of both stores, a
//! tab rebuild and a re-render.

#![warn(missing_docs, clippy::pedantic)]

mod confirm;
mod error;
mod session;
mod upload;

pub use confirm::{AlwaysConfirm, Confirm};
pub use error::{SessionError, SessionResult};
pub use session::{ImageChange, ManagerSession, MutationOutcome};
pub use upload::{ImageAttachment, ImageEvent, ImagePhase, UploadError, UploadResult};
