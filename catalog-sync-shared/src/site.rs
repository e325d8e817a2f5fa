//! Site (locale) definitions.

use serde::{Deserialize, Serialize};

/// A site of the content repository: one handle plus the language its
/// content is published in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    /// Site handle, e.g. `en` or `germanSite`.
    pub handle: String,
    /// Language code, e.g. `en-US`.
    pub language: String,
    /// Human readable name used in progress labels. Falls back to the handle.
    #[serde(default)]
    pub name: String,
}

impl Site {
    /// Create a site whose display name equals its handle.
    pub fn new(handle: impl Into<String>, language: impl Into<String>) -> Self {
        let handle = handle.into();
        Self {
            name: handle.clone(),
            handle,
            language: language.into(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The name to show to operators.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.handle
        } else {
            &self.name
        }
    }
}
