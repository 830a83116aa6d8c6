//! JSON bodies exchanged over the REST contract.

use serde::{Deserialize, Serialize};

use crate::{PromptIndex, PromptRecord};

/// Body of `DELETE /prompt_manager/delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRequest {
    /// Record to delete.
    pub index: PromptIndex,
}

/// Body of the category add/delete endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRequest {
    /// Raw category name; the server normalises it.
    #[serde(default)]
    pub category: String,
}

/// Body of `DELETE /prompt_manager/image/delete`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameRequest {
    /// Stored image filename.
    #[serde(default)]
    pub filename: String,
}

/// Body of `POST /prompt_manager/save`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Complete replacement list.
    #[serde(default)]
    pub prompts: Vec<PromptRecord>,
}

/// Outcome marker carried by every JSON response envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The request succeeded.
    Success,
    /// The request failed; see `message`.
    Error,
}

/// Response envelope of the mutating endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Outcome marker.
    pub status: Status,
    /// Error description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Index assigned by `add`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<PromptIndex>,
    /// Stored filename returned by `upload_image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Updated category list returned by the category endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Title of the record removed by `delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<String>,
    /// Number of records written by `save`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl ApiResponse {
    /// A bare success envelope.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
            index: None,
            filename: None,
            categories: None,
            deleted: None,
            count: None,
        }
    }

    /// An error envelope with the supplied message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            ..Self::success()
        }
    }

    /// Attaches an assigned index.
    #[must_use]
    pub const fn with_index(mut self, index: PromptIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Attaches a stored filename.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attaches the category list.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Attaches the deleted record's title.
    #[must_use]
    pub fn with_deleted(mut self, title: impl Into<String>) -> Self {
        self.deleted = Some(title.into());
        self
    }

    /// Attaches a record count.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}
