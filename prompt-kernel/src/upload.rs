//! Image attachment state machine used by add and edit.

use prompt_primitives::PromptIndex;
use thiserror::Error;
use tracing::debug;

/// Progress of the optional image attached to a saved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePhase {
    /// The record is saved; no upload has been attempted.
    Created,
    /// The upload is in flight.
    ImageUploading,
    /// The upload succeeded and the record references the file.
    ImageAttached,
    /// The upload failed; the record stays saved without an image.
    ImageFailed,
}

impl ImagePhase {
    /// Returns `true` once no further events are accepted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::ImageAttached | Self::ImageFailed)
    }
}

/// Events that drive [`ImagePhase`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEvent {
    /// Start uploading the chosen file.
    BeginUpload,
    /// The file was stored and linked to the record.
    Attached,
    /// Upload or linking failed.
    Failed,
}

/// Tracks the image phase of one record.
#[derive(Debug, Clone, Copy)]
pub struct ImageAttachment {
    index: PromptIndex,
    phase: ImagePhase,
}

impl ImageAttachment {
    /// Starts tracking a freshly saved record.
    #[must_use]
    pub const fn new(index: PromptIndex) -> Self {
        Self {
            index,
            phase: ImagePhase::Created,
        }
    }

    /// Returns the record index.
    #[must_use]
    pub const fn index(&self) -> PromptIndex {
        self.index
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> ImagePhase {
        self.phase
    }

    /// Applies an event, returning the resulting phase.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InvalidTransition`] when the event is not allowed
    /// from the current phase.
    pub fn transition(&mut self, event: ImageEvent) -> UploadResult<ImagePhase> {
        let next = match (self.phase, event) {
            (ImagePhase::Created, ImageEvent::BeginUpload) => ImagePhase::ImageUploading,
            (ImagePhase::ImageUploading, ImageEvent::Attached) => ImagePhase::ImageAttached,
            (ImagePhase::ImageUploading, ImageEvent::Failed) => ImagePhase::ImageFailed,
            (from, event) => {
                return Err(UploadError::InvalidTransition {
                    index: self.index,
                    from,
                    event,
                });
            }
        };

        debug!(index = %self.index, from = ?self.phase, to = ?next, ?event, "image phase transition");
        self.phase = next;
        Ok(next)
    }
}

/// Errors emitted by [`ImageAttachment`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// Transition was not permitted from the current phase.
    #[error("invalid image transition from {from:?} via {event:?} for prompt {index}")]
    InvalidTransition {
        /// Record whose transition failed.
        index: PromptIndex,
        /// Phase prior to the attempted transition.
        from: ImagePhase,
        /// Event that triggered the failure.
        event: ImageEvent,
    },
}

/// Result alias for image phase transitions.
pub type UploadResult<T> = Result<T, UploadError>;
