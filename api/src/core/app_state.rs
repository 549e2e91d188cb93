use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use contextor::{Contextor, ContextorConfig};
use rag_store::{PineconeConfig, RagStore};
use tracing::info;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Query pipeline wired to OpenAI and Pinecone.
    pub contextor: Arc<Contextor>,
}

impl AppState {
    pub fn new(contextor: Contextor) -> Self {
        Self {
            contextor: Arc::new(contextor),
        }
    }

    /// Build providers from environment variables and check that Pinecone answers.
    ///
    /// # Errors
    /// Missing or malformed configuration, or a failed index listing.
    pub async fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let (chat_model, embedding_model) = llm.models();
        info!(chat_model, embedding_model, "OpenAI profiles ready");

        let store = Arc::new(RagStore::new(PineconeConfig::from_env()?)?);
        let cfg = ContextorConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
        let fanout = cfg.fanout_concurrency;

        let contextor = Contextor::new(llm.clone(), store, llm, cfg);
        let indexes = contextor
            .list_indexes()
            .await
            .map_err(AppError::Startup)?;
        info!(indexes = indexes.len(), fanout, "Pinecone reachable");

        Ok(Self::new(contextor))
    }
}
