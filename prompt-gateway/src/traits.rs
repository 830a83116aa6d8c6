//! The gateway trait and its shared data structures.

use async_trait::async_trait;
use bytes::Bytes;
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord};
use prompt_store::{ImageKind, StoreError};
use thiserror::Error;

/// Result alias used by gateways.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error type shared by gateway implementations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Gateway is misconfigured.
    #[error("gateway not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// Transport-level failures (network, protocol, timeout).
    #[error("gateway transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {reason}")]
    Response {
        /// HTTP status code.
        status: u16,
        /// Message reported by the backend, or the raw body.
        reason: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("failed to decode backend response: {reason}")]
    Decode {
        /// Additional context about the decode failure.
        reason: String,
    },

    /// In-process store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GatewayError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for decode failures.
    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    /// Returns `true` when the backend reported the target as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Response { status: 404, .. })
            || matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}

/// An image file chosen by the user for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    data: Bytes,
}

impl ImageUpload {
    /// Wraps the original file name and its contents.
    #[must_use]
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Returns the original file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the file contents.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// MIME type guessed from the file extension.
    #[must_use]
    pub fn content_type(&self) -> &'static str {
        prompt_store::images::content_type_for(&self.file_name)
    }

    /// Returns `true` when the extension is one the backend accepts.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| ImageKind::from_extension(ext))
            .is_some()
    }
}

/// Access to the prompt manager backend.
#[async_trait]
pub trait PromptGateway: Send + Sync {
    /// Lists every prompt record.
    async fn list_prompts(&self) -> GatewayResult<Vec<PromptRecord>>;

    /// Lists every known category.
    async fn list_categories(&self) -> GatewayResult<Vec<CategoryLabel>>;

    /// Creates a record and returns the index the backend assigned.
    async fn add_prompt(&self, new: &NewPrompt) -> GatewayResult<PromptIndex>;

    /// Replaces a record.
    async fn update_prompt(&self, record: &PromptRecord) -> GatewayResult<()>;

    /// Deletes a record (and its image).
    async fn delete_prompt(&self, index: PromptIndex) -> GatewayResult<()>;

    /// Registers a category.
    async fn add_category(&self, category: &str) -> GatewayResult<()>;

    /// Removes a category; records keep their labels.
    async fn delete_category(&self, category: &str) -> GatewayResult<()>;

    /// Uploads a preview image for `index`, returning the stored filename.
    async fn upload_image(&self, index: PromptIndex, image: &ImageUpload)
    -> GatewayResult<String>;

    /// Downloads a preview image.
    async fn fetch_image(&self, filename: &str) -> GatewayResult<Bytes>;

    /// Deletes a preview image.
    async fn delete_image(&self, filename: &str) -> GatewayResult<()>;

    /// Replaces the entire prompt list, returning the number of records saved.
    async fn save_all(&self, prompts: &[PromptRecord]) -> GatewayResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_guesses_content_type() {
        let upload = ImageUpload::new("Preview.PNG", vec![1_u8, 2, 3]);
        assert_eq!(upload.content_type(), "image/png");
        assert!(upload.is_supported());
        assert!(!ImageUpload::new("notes.txt", Vec::new()).is_supported());
    }

    #[test]
    fn not_found_detection() {
        let remote = GatewayError::Response {
            status: 404,
            reason: "gone".into(),
        };
        assert!(remote.is_not_found());
        assert!(GatewayError::from(StoreError::not_found("prompt 1")).is_not_found());
        assert!(!GatewayError::transport("refused").is_not_found());
    }
}
