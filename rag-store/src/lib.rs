//! Vector search facade over Pinecone indexes and namespaces.
//!
//! This crate provides a small API to:
//! - Enumerate indexes and the namespaces inside one index
//! - Run a top-K nearest-neighbour query in one (index, namespace) pair
//!
//! Results come back as [`SearchMatch`] values annotated with their origin;
//! Pinecone's wire types stay private to the crate.

mod config;
mod errors;
mod pinecone_facade;
mod record;

pub use config::PineconeConfig;
pub use errors::RagError;
pub use record::SearchMatch;

use async_trait::async_trait;
use tracing::{debug, trace};

/// Read-only vector search operations used by the query pipeline.
///
/// Implementations hold no per-request state and must be safe to share across tasks.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Names of all indexes known to the provider.
    async fn list_indexes(&self) -> Result<Vec<String>, RagError>;

    /// Namespace names inside `index_name`.
    async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, RagError>;

    /// Top-`top_k` matches for `vector` in `index_name`, optionally restricted to `namespace`.
    async fn search(
        &self,
        vector: &[f32],
        index_name: &str,
        namespace: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<SearchMatch>, RagError>;
}

/// High-level facade that wires configuration and the Pinecone client.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    client: pinecone_facade::PineconeFacade,
}

impl RagStore {
    /// Constructs a new store from the given configuration.
    ///
    /// # Errors
    /// Returns `RagError::Config` if validation or client initialization fails.
    pub fn new(cfg: PineconeConfig) -> Result<Self, RagError> {
        trace!("RagStore::new controller={}", cfg.controller_url);
        let client = pinecone_facade::PineconeFacade::new(&cfg)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VectorSearch for RagStore {
    async fn list_indexes(&self) -> Result<Vec<String>, RagError> {
        let indexes = self.client.list_indexes().await?;
        debug!(count = indexes.len(), "RagStore::list_indexes");
        Ok(indexes)
    }

    async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, RagError> {
        let namespaces = self.client.list_namespaces(index_name).await?;
        debug!(
            index = index_name,
            count = namespaces.len(),
            "RagStore::list_namespaces"
        );
        Ok(namespaces)
    }

    async fn search(
        &self,
        vector: &[f32],
        index_name: &str,
        namespace: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<SearchMatch>, RagError> {
        trace!(
            index = index_name,
            namespace = namespace.unwrap_or(""),
            top_k,
            "RagStore::search"
        );
        let matches = self
            .client
            .query(vector, index_name, namespace, top_k)
            .await?;
        debug!(
            index = index_name,
            namespace = namespace.unwrap_or(""),
            hits = matches.len(),
            "RagStore::search completed"
        );
        Ok(matches)
    }
}
