//! Record lookup behind the remote-select fields.
//!
//! Post and term selects render as hidden inputs carrying an id; the browser
//! widget queries the search endpoints below for candidates, and the renderer
//! resolves the display title of the current id through a [`RecordSource`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::FormEngine;
use crate::error::{FormError, Result};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record id, as stored in the hidden input.
    pub id: u64,
    /// Display label.
    pub label: String,
    /// Post type or taxonomy of the record.
    pub kind: String,
}

/// Read-only store of post-like and term-like records.
pub trait RecordSource: Send + Sync {
    /// Title of the post with the given id.
    fn post_title(&self, id: &str) -> Option<String>;

    /// Name of the term with the given id in `taxonomy`.
    fn term_name(&self, id: u64, taxonomy: &str) -> Option<String>;

    /// Whether `taxonomy` exists.
    fn taxonomy_exists(&self, taxonomy: &str) -> bool;

    /// Posts matching `term`, restricted to `post_types` when not empty.
    fn search_posts(&self, term: &str, post_types: &[String]) -> Vec<Record>;

    /// Terms of `taxonomy` matching `term`.
    fn search_terms(&self, term: &str, taxonomy: &str) -> Vec<Record>;
}

/// Empty record store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecords;

impl RecordSource for NoRecords {
    fn post_title(&self, _id: &str) -> Option<String> {
        None
    }

    fn term_name(&self, _id: u64, _taxonomy: &str) -> Option<String> {
        None
    }

    fn taxonomy_exists(&self, _taxonomy: &str) -> bool {
        false
    }

    fn search_posts(&self, _term: &str, _post_types: &[String]) -> Vec<Record> {
        Vec::new()
    }

    fn search_terms(&self, _term: &str, _taxonomy: &str) -> Vec<Record> {
        Vec::new()
    }
}

/// In-memory record store, loadable from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryRecords {
    /// Posts; `kind` is the post type.
    pub posts: Vec<Record>,
    /// Terms; `kind` is the taxonomy.
    pub terms: Vec<Record>,
}

impl MemoryRecords {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a post.
    #[must_use]
    pub fn post(mut self, id: u64, title: impl Into<String>, post_type: impl Into<String>) -> Self {
        self.posts.push(Record {
            id,
            label: title.into(),
            kind: post_type.into(),
        });
        self
    }

    /// Adds a term.
    #[must_use]
    pub fn term(mut self, id: u64, name: impl Into<String>, taxonomy: impl Into<String>) -> Self {
        self.terms.push(Record {
            id,
            label: name.into(),
            kind: taxonomy.into(),
        });
        self
    }
}

fn matches_term(record: &Record, term: &str) -> bool {
    record.label.to_lowercase().contains(&term.to_lowercase())
}

impl RecordSource for MemoryRecords {
    fn post_title(&self, id: &str) -> Option<String> {
        let id: u64 = id.trim().parse().ok()?;
        self.posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.label.clone())
    }

    fn term_name(&self, id: u64, taxonomy: &str) -> Option<String> {
        self.terms
            .iter()
            .find(|t| t.id == id && t.kind == taxonomy)
            .map(|t| t.label.clone())
    }

    fn taxonomy_exists(&self, taxonomy: &str) -> bool {
        self.terms.iter().any(|t| t.kind == taxonomy)
    }

    fn search_posts(&self, term: &str, post_types: &[String]) -> Vec<Record> {
        self.posts
            .iter()
            .filter(|p| post_types.is_empty() || post_types.contains(&p.kind))
            .filter(|p| matches_term(p, term))
            .cloned()
            .collect()
    }

    fn search_terms(&self, term: &str, taxonomy: &str) -> Vec<Record> {
        self.terms
            .iter()
            .filter(|t| t.kind == taxonomy && matches_term(t, term))
            .cloned()
            .collect()
    }
}

/// Request of the post search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSearch {
    pub term: Option<String>,
    #[serde(default)]
    pub post_type: Vec<String>,
}

/// Request of the term search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermSearch {
    pub term: Option<String>,
    pub taxonomy: Option<String>,
}

/// JSON envelope returned by the search endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Record>>,
}

impl SearchResponse {
    /// Wraps search results in the response envelope.
    pub fn from_result(result: Result<Vec<Record>>) -> Self {
        match result {
            Ok(records) => Self {
                success: true,
                data: Some(records),
            },
            Err(err) => {
                debug!(%err, "search request rejected");
                Self {
                    success: false,
                    data: None,
                }
            }
        }
    }
}

impl FormEngine {
    /// Searches posts by title.
    pub fn search_posts(&self, request: &PostSearch) -> Result<Vec<Record>> {
        let term = request.term.as_deref().ok_or(FormError::MissingSearchTerm)?;
        Ok(self.records().search_posts(term, &request.post_type))
    }

    /// Searches terms of a taxonomy by name. Missing terms match everything.
    pub fn search_terms(&self, request: &TermSearch) -> Result<Vec<Record>> {
        let taxonomy = request.taxonomy.as_deref().unwrap_or_default();
        if taxonomy.is_empty() || !self.records().taxonomy_exists(taxonomy) {
            return Err(FormError::UnknownTaxonomy(taxonomy.to_string()));
        }
        let term = request.term.as_deref().unwrap_or_default();
        Ok(self.records().search_terms(term, taxonomy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryRecords {
        MemoryRecords::new()
            .post(1, "Hello World", "post")
            .post(2, "About Us", "page")
            .post(3, "Hello Again", "page")
            .term(10, "Rust", "category")
            .term(11, "Rustaceans", "post_tag")
    }

    #[test]
    fn test_search_posts_filters_by_type() {
        let engine = FormEngine::new().with_records(store());
        let hits = engine
            .search_posts(&PostSearch {
                term: Some("hello".to_string()),
                post_type: vec!["page".to_string()],
            })
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);
    }

    #[test]
    fn test_search_posts_requires_term() {
        let engine = FormEngine::new().with_records(store());
        let err = engine.search_posts(&PostSearch::default()).unwrap_err();
        assert!(matches!(err, FormError::MissingSearchTerm));
    }

    #[test]
    fn test_search_terms_requires_known_taxonomy() {
        let engine = FormEngine::new().with_records(store());
        let err = engine
            .search_terms(&TermSearch {
                term: Some("rust".to_string()),
                taxonomy: Some("genre".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownTaxonomy(t) if t == "genre"));

        let hits = engine
            .search_terms(&TermSearch {
                term: Some("rust".to_string()),
                taxonomy: Some("category".to_string()),
            })
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "Rust");
    }

    #[test]
    fn test_response_envelope() {
        let ok = SearchResponse::from_result(Ok(vec![]));
        assert_eq!(
            serde_json::to_string(&ok).unwrap(),
            r#"{"success":true,"data":[]}"#
        );
        let err = SearchResponse::from_result(Err(FormError::MissingSearchTerm));
        assert_eq!(serde_json::to_string(&err).unwrap(), r#"{"success":false}"#);
    }

    #[test]
    fn test_lookups() {
        let records = store();
        assert_eq!(records.post_title("2"), Some("About Us".to_string()));
        assert_eq!(records.post_title("abc"), None);
        assert_eq!(records.term_name(10, "category"), Some("Rust".to_string()));
        assert_eq!(records.term_name(10, "post_tag"), None);
    }
}
