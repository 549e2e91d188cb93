//! Unified error types for the crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Pinecone answered with a non-success status.
    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Index name that cannot be used as a single URL path segment.
    #[error("invalid index name: {0:?}")]
    InvalidIndexName(String),

    /// The control plane has no index with this name.
    #[error("index not found: {0}")]
    IndexNotFound(String),
}
