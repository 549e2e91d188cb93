//! Typed error for the contextor crate.

use ai_llm_service::AiLlmError;
use rag_store::RagError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// The query was rejected before any provider call.
    #[error("{0}")]
    InvalidRequest(String),

    /// Pipeline configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// The embedding provider failed.
    #[error("OpenAI Embedding API call failed: {0}")]
    Embedding(#[source] AiLlmError),

    /// Listing indexes or namespaces failed.
    #[error("Failed to list {what}: {source}")]
    Catalog {
        what: &'static str,
        #[source]
        source: RagError,
    },

    /// A vector query that is not covered by fan-out tolerance failed.
    #[error("Pinecone query failed: {0}")]
    Search(#[source] RagError),

    /// The chat-completion provider failed.
    #[error("OpenAI Chat API call failed: {0}")]
    Generation(#[source] AiLlmError),
}

impl ContextorError {
    /// Stable, machine-readable code for logs and HTTP bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            ContextorError::InvalidRequest(_) => "INVALID_REQUEST",
            ContextorError::Config(_) => "CONFIG_ERROR",
            ContextorError::Embedding(_) => "EMBEDDING_FAILED",
            ContextorError::Catalog { .. } => "CATALOG_FAILED",
            ContextorError::Search(_) => "SEARCH_FAILED",
            ContextorError::Generation(_) => "GENERATION_FAILED",
        }
    }

    /// `true` when the caller sent something unusable (as opposed to a provider failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ContextorError::InvalidRequest(_))
    }
}
