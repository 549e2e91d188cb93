//! Public API types re-used by external crates (e.g., the HTTP API layer).

use serde::{Deserialize, Serialize};

use crate::error::ContextorError;

pub const MIN_TOP_K: usize = 1;
pub const MAX_TOP_K: usize = 20;
pub const DEFAULT_TOP_K: usize = 5;

/// Answer returned when retrieval produced no usable context.
pub const INSUFFICIENT_INFO_ANSWER: &str =
    "I don't have enough information to answer this question.";

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// One incoming question.
///
/// # Example
/// ```
/// use contextor::QueryRequest;
/// let req = QueryRequest::new("What is the rated pressure?", 5);
/// assert!(req.validate().is_ok());
/// assert!(QueryRequest::new("q", 21).validate().is_err());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QueryRequest {
    /// Natural language question.
    pub query: String,
    /// Number of chunks to keep after ranking (1..=20).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self {
            query: query.into(),
            top_k,
        }
    }

    /// Checks bounds before any provider is contacted.
    pub fn validate(&self) -> Result<(), ContextorError> {
        if self.query.trim().is_empty() {
            return Err(ContextorError::InvalidRequest(
                "query must not be empty".into(),
            ));
        }
        if !(MIN_TOP_K..=MAX_TOP_K).contains(&self.top_k) {
            return Err(ContextorError::InvalidRequest(format!(
                "top_k must be between {MIN_TOP_K} and {MAX_TOP_K}, got {}",
                self.top_k
            )));
        }
        Ok(())
    }
}

/// Where a query is searched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// Exactly one (index, namespace) pair.
    Namespace { index: String, namespace: String },
    /// Every namespace of one index.
    Index { index: String },
    /// Every namespace of every index.
    Database,
}

impl SearchScope {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            SearchScope::Namespace { .. } => "scoped",
            SearchScope::Index { .. } => "all-namespaces",
            SearchScope::Database => "whole-database",
        }
    }
}

/// Provenance of one retrieved chunk.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reference {
    pub file_name: String,
    pub page: i64,
    pub namespace: String,
    pub index_name: String,
}

/// Result of one question: either a generated answer or "nothing found".
///
/// Provider failures are reported through `Err(ContextorError)` instead.
#[derive(Clone, Debug, PartialEq)]
pub enum QaOutcome {
    /// The model answered from the retrieved context.
    Answered {
        answer: String,
        references: Vec<Reference>,
    },
    /// Retrieval produced no context; the model was not called.
    Empty,
}

impl QaOutcome {
    /// Answer text and references as returned to callers.
    pub fn into_parts(self) -> (String, Vec<Reference>) {
        match self {
            QaOutcome::Answered { answer, references } => (answer, references),
            QaOutcome::Empty => (INSUFFICIENT_INFO_ANSWER.to_string(), Vec::new()),
        }
    }
}
