//! RAG query pipeline over Pinecone and OpenAI.
//!
//! Public API: [`Contextor::ask`]. It validates the request, embeds the
//! question, searches the requested [`SearchScope`], merges and ranks the
//! matches, and asks the chat model to answer from the retrieved context.
//! When nothing usable comes back the model is not called and the outcome is
//! [`QaOutcome::Empty`].

mod aggregate;
mod api_types;
mod cfg;
mod error;
mod llm;
pub mod prompt;
mod retrieve;

pub use aggregate::{RetrievedContext, SourceTag, aggregate, extract, merge_and_rank};
pub use api_types::{
    DEFAULT_TOP_K, INSUFFICIENT_INFO_ANSWER, MAX_TOP_K, MIN_TOP_K, QaOutcome, QueryRequest,
    Reference, SearchScope,
};
pub use cfg::ContextorConfig;
pub use error::ContextorError;
pub use llm::{ChatModel, QueryEmbedder};

use std::sync::Arc;
use std::time::Instant;

use rag_store::VectorSearch;
use tracing::{debug, info};

/// Query pipeline wired to its providers.
///
/// Cheap to share behind `Arc`; holds no per-request state.
pub struct Contextor {
    embedder: Arc<dyn QueryEmbedder>,
    store: Arc<dyn VectorSearch>,
    chat: Arc<dyn ChatModel>,
    cfg: ContextorConfig,
}

impl Contextor {
    pub fn new(
        embedder: Arc<dyn QueryEmbedder>,
        store: Arc<dyn VectorSearch>,
        chat: Arc<dyn ChatModel>,
        cfg: ContextorConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            chat,
            cfg,
        }
    }

    /// Names of all indexes.
    pub async fn list_indexes(&self) -> Result<Vec<String>, ContextorError> {
        self.store
            .list_indexes()
            .await
            .map_err(|source| ContextorError::Catalog {
                what: "indexes",
                source,
            })
    }

    /// Namespace names inside `index_name`.
    pub async fn list_namespaces(&self, index_name: &str) -> Result<Vec<String>, ContextorError> {
        self.store
            .list_namespaces(index_name)
            .await
            .map_err(|source| ContextorError::Catalog {
                what: "namespaces",
                source,
            })
    }

    /// Embed, search, and aggregate without calling the chat model.
    pub async fn retrieve(
        &self,
        req: &QueryRequest,
        scope: &SearchScope,
    ) -> Result<RetrievedContext, ContextorError> {
        req.validate()?;

        let t0 = Instant::now();
        let vector = self
            .embedder
            .embed(&req.query)
            .await
            .map_err(ContextorError::Embedding)?;
        debug!(
            dim = vector.len(),
            latency_ms = t0.elapsed().as_millis() as u64,
            "query embedded"
        );

        let t1 = Instant::now();
        let matches = retrieve::collect_matches(
            self.store.as_ref(),
            &vector,
            scope,
            req.top_k,
            self.cfg.fanout_concurrency,
        )
        .await?;
        debug!(
            scope = scope.label(),
            hits = matches.len(),
            latency_ms = t1.elapsed().as_millis() as u64,
            "search finished"
        );

        Ok(aggregate(matches, req.top_k, SourceTag::for_scope(scope)))
    }

    /// Answer `req` from documents in `scope`.
    ///
    /// # Errors
    /// `InvalidRequest` before any provider call when the request is out of
    /// bounds; otherwise the first provider failure not absorbed by fan-out.
    ///
    /// # Example
    /// ```no_run
    /// # use contextor::{Contextor, QueryRequest, SearchScope};
    /// # async fn run(ctx: &Contextor) -> Result<(), contextor::ContextorError> {
    /// let req = QueryRequest::new("What is the rated pressure?", 5);
    /// let (answer, refs) = ctx.ask(&req, &SearchScope::Database).await?.into_parts();
    /// println!("{answer} ({} refs)", refs.len());
    /// # Ok(()) }
    /// ```
    pub async fn ask(
        &self,
        req: &QueryRequest,
        scope: &SearchScope,
    ) -> Result<QaOutcome, ContextorError> {
        let retrieved = self.retrieve(req, scope).await?;
        if retrieved.is_empty() {
            info!(scope = scope.label(), "no context found");
            return Ok(QaOutcome::Empty);
        }

        let t0 = Instant::now();
        let answer = self.generate(&retrieved.context, &req.query).await?;
        info!(
            scope = scope.label(),
            references = retrieved.references.len(),
            latency_ms = t0.elapsed().as_millis() as u64,
            "answer generated"
        );

        Ok(QaOutcome::Answered {
            answer,
            references: retrieved.references,
        })
    }

    /// Ask the chat model to answer `query` from `context`.
    pub async fn generate(&self, context: &str, query: &str) -> Result<String, ContextorError> {
        let user = prompt::build_user_prompt(context, query);
        self.chat
            .chat(prompt::SYSTEM_PROMPT, &user)
            .await
            .map_err(ContextorError::Generation)
    }
}
