//! Engine configuration.

use serde::Deserialize;

/// Configuration shared by every render and process call of an engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Prefix of structural classes and generated input ids.
    pub class_prefix: String,
    /// Label of the blank option of non-required selects without a placeholder.
    pub select_placeholder: String,
    /// Reverse host-level slash escaping of the input, once, at the root.
    pub unslash_input: bool,
    /// Rows of the textarea that replaces a rich-text editor.
    pub textarea_fallback_rows: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            class_prefix: "form".to_string(),
            select_placeholder: "- select -".to_string(),
            unslash_input: false,
            textarea_fallback_rows: 10,
        }
    }
}

impl FormConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the class prefix.
    #[must_use]
    pub fn class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = prefix.into();
        self
    }

    /// Sets the blank select option label.
    #[must_use]
    pub fn select_placeholder(mut self, label: impl Into<String>) -> Self {
        self.select_placeholder = label.into();
        self
    }

    /// Unslashes posted input before processing.
    #[must_use]
    pub fn unslash_input(mut self) -> Self {
        self.unslash_input = true;
        self
    }

    /// Sets the rows of the rich-text fallback textarea.
    #[must_use]
    pub fn textarea_fallback_rows(mut self, rows: u32) -> Self {
        self.textarea_fallback_rows = rows;
        self
    }

    /// Returns `{prefix}-{suffix}`.
    pub(crate) fn prefixed(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.class_prefix)
    }
}
