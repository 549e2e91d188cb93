//! Model seams used by the pipeline, implemented for the shared OpenAI profiles.

use ai_llm_service::{AiLlmError, LlmServiceProfiles};
use async_trait::async_trait;

/// Turns query text into a vector.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiLlmError>;
}

/// Answers a `(system, user)` prompt pair.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn chat(&self, system: &str, user: &str) -> Result<String, AiLlmError>;
}

#[async_trait]
impl QueryEmbedder for LlmServiceProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, AiLlmError> {
        LlmServiceProfiles::embed(self, text).await
    }
}

#[async_trait]
impl ChatModel for LlmServiceProfiles {
    async fn chat(&self, system: &str, user: &str) -> Result<String, AiLlmError> {
        self.generate(user, Some(system)).await
    }
}
