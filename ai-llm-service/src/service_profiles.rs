//! Shared LLM service with two active profiles: `chat` and `embedding`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Each profile owns its own preconfigured HTTP client; nothing is created per call.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let emb = svc.embed("hydraulic pump maintenance").await?;
//! println!("Embedding dim = {}", emb.len());
//!
//! let txt = svc.generate("Say hello", Some("Be brief.")).await?;
//! println!("CHAT: {}", txt);
//! # Ok(()) }
//! ```

use crate::{
    config::{
        default_config::{config_openai_chat, config_openai_embedding},
        llm_model_config::LlmModelConfig,
    },
    error_handler::AiLlmError,
    services::open_ai_service::OpenAiService,
};

/// Shared service that manages the **chat** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    chat: OpenAiService,
    embedding: OpenAiService,
}

impl LlmServiceProfiles {
    /// Creates a new service with both profiles.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either client cannot be constructed.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(Self {
            chat: OpenAiService::new(chat)?,
            embedding: OpenAiService::new(embedding)?,
        })
    }

    /// Loads both profiles from the environment (see `config::default_config`).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(config_openai_chat()?, config_openai_embedding()?)
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Arguments
    /// - `prompt`: user message.
    /// - `system`: optional system instruction.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        self.chat.generate(prompt, system).await
    }

    /// Computes an embedding using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.embedding.embeddings(input).await
    }

    /// Returns the configured `(chat, embedding)` model names.
    pub fn models(&self) -> (&str, &str) {
        (self.chat.model(), self.embedding.model())
    }
}
