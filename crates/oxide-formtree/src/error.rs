//! Error types for form rendering and processing.

use thiserror::Error;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// An element has no usable key.
    ///
    /// Fatal for the whole render or process call: sibling names and slugs
    /// depend on a stable key, so the subtree cannot be skipped.
    #[error("every element must have a key (slug: {slug:?})")]
    MissingKey { slug: String },

    /// A repeatable value entry sits under a non-integer or negative index.
    ///
    /// Recovered locally by skipping the entry.
    #[error("invalid repeatable index: {0}")]
    InvalidRepeatableIndex(String),

    /// The schema definition could not be loaded.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record search was requested without a search term.
    #[error("missing search term")]
    MissingSearchTerm,

    /// A term search named a taxonomy the record source does not know.
    #[error("unknown taxonomy: {0}")]
    UnknownTaxonomy(String),
}

impl FormError {
    /// Creates a missing key error for an element slug.
    pub fn missing_key(slug: impl Into<String>) -> Self {
        Self::MissingKey { slug: slug.into() }
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = FormError::missing_key("address-street");
        assert_eq!(
            err.to_string(),
            r#"every element must have a key (slug: "address-street")"#
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{");
        let err: FormError = parse.unwrap_err().into();
        assert!(matches!(err, FormError::Json(_)));
    }
}
