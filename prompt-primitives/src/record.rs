//! Prompt records as exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::PromptIndex;

/// A single reusable prompt entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    /// Backend-assigned unique index.
    pub index: PromptIndex,
    /// Short display title.
    pub title: String,
    /// Prompt body emitted into the node output.
    pub prompt: String,
    /// Category labels in display order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Whether the record is pinned to the favourites tab.
    #[serde(default)]
    pub favorite: bool,
    /// Filename of the preview image, if any.
    #[serde(default)]
    pub image: Option<String>,
}

impl PromptRecord {
    /// Assembles a record from a creation payload and its assigned index.
    #[must_use]
    pub fn from_new(index: PromptIndex, new: NewPrompt) -> Self {
        Self {
            index,
            title: new.title,
            prompt: new.prompt,
            categories: new.categories,
            favorite: new.favorite,
            image: new.image,
        }
    }

    /// Returns `true` when `category` is one of the record's labels.
    ///
    /// The comparison is exact and case-sensitive.
    #[must_use]
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Returns the preview image filename when one is attached.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Case-insensitive substring match against the title or body.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.prompt.to_lowercase().contains(needle)
    }

    /// Trims the text fields and rejects empty title or body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] when the title or prompt is blank.
    pub fn validate(mut self) -> Result<Self> {
        self.title = required("title", &self.title)?;
        self.prompt = required("prompt", &self.prompt)?;
        Ok(self)
    }
}

/// Payload used to create a prompt record; the backend assigns the index.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrompt {
    /// Short display title.
    pub title: String,
    /// Prompt body.
    pub prompt: String,
    /// Category labels.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Favourite flag.
    #[serde(default)]
    pub favorite: bool,
    /// Preview image filename.
    #[serde(default)]
    pub image: Option<String>,
}

impl NewPrompt {
    /// Creates a payload with the supplied title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the category labels.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the favourite flag.
    #[must_use]
    pub const fn with_favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }

    /// Trims the text fields and rejects empty title or body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] when the title or prompt is blank.
    pub fn validate(mut self) -> Result<Self> {
        self.title = required("title", &self.title)?;
        self.prompt = required("prompt", &self.prompt)?;
        Ok(self)
    }
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::empty_field(field));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_trims_and_rejects_blank() {
        let ok = NewPrompt::new("  Title ", " body ").validate().unwrap();
        assert_eq!(ok.title, "Title");
        assert_eq!(ok.prompt, "body");

        let err = NewPrompt::new("title", "   ").validate().unwrap_err();
        assert_eq!(err, Error::empty_field("prompt"));
    }

    #[test]
    fn wire_format_uses_null_image() {
        let record = PromptRecord::from_new(PromptIndex::new(3), NewPrompt::new("t", "p"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["index"], 3);
        assert!(json["image"].is_null());
        assert_eq!(json["categories"], serde_json::json!([]));
    }

    #[test]
    fn missing_optional_fields_default() {
        let record: PromptRecord =
            serde_json::from_str(r#"{"index": 1, "title": "t", "prompt": "p"}"#).unwrap();
        assert!(!record.favorite);
        assert!(record.categories.is_empty());
        assert_eq!(record.image(), None);
    }

    #[test]
    fn blank_image_name_is_no_image() {
        let mut record = PromptRecord::from_new(PromptIndex::new(1), NewPrompt::new("t", "p"));
        record.image = Some("  ".into());
        assert_eq!(record.image(), None);
    }

    #[test]
    fn search_matches_title_or_body() {
        let record = PromptRecord::from_new(
            PromptIndex::new(1),
            NewPrompt::new("Soft Light", "golden hour portrait"),
        );
        assert!(record.matches_lowercase("soft"));
        assert!(record.matches_lowercase("golden"));
        assert!(!record.matches_lowercase("neon"));
    }
}
