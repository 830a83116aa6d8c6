//! Prompt identifier types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Backend-assigned index of a prompt record.
///
/// Indices are unique within a prompt store and never reused while the record
/// exists. They are the only key used for selection, lookup and output order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptIndex(u64);

impl PromptIndex {
    /// Creates an index from its raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the index following this one, or `None` at `u64::MAX`.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl Display for PromptIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for PromptIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PromptIndex> for u64 {
    fn from(value: PromptIndex) -> Self {
        value.0
    }
}

impl FromStr for PromptIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidIndex { value: s.to_owned() })
    }
}
