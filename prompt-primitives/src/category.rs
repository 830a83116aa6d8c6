//! Category labels attached to prompt records.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const MAX_LABEL_LEN: usize = 64;

/// A normalised (trimmed, lower-cased) category label.
///
/// Labels never contain `,` or `|` because both act as separators in the
/// on-disk prompt format.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryLabel(String);

impl CategoryLabel {
    /// Normalises and validates a category label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCategory`] when the label is empty after
    /// trimming, too long, or contains a reserved separator.
    pub fn new(label: impl AsRef<str>) -> Result<Self> {
        let raw = label.as_ref();
        let normalized = raw.trim().to_lowercase();
        validate_label(raw, &normalized)?;
        Ok(Self(normalized))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CategoryLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CategoryLabel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for CategoryLabel {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<CategoryLabel> for String {
    fn from(value: CategoryLabel) -> Self {
        value.0
    }
}

impl PartialEq<str> for CategoryLabel {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

fn validate_label(raw: &str, normalized: &str) -> Result<()> {
    if normalized.is_empty() {
        return Err(Error::InvalidCategory {
            label: raw.to_owned(),
            reason: "category name cannot be empty".into(),
        });
    }

    if normalized.chars().count() > MAX_LABEL_LEN {
        return Err(Error::InvalidCategory {
            label: raw.to_owned(),
            reason: format!("category name length must be <= {MAX_LABEL_LEN}"),
        });
    }

    if normalized.contains([',', '|']) {
        return Err(Error::InvalidCategory {
            label: raw.to_owned(),
            reason: "category name cannot contain ',' or '|'".into(),
        });
    }

    Ok(())
}
