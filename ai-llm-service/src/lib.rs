//! OpenAI-compatible embeddings and chat completion client.
//!
//! Public API:
//! - [`LlmServiceProfiles`]: chat + embedding profiles built once from env.
//! - [`OpenAiService`]: the underlying non-streaming HTTP client.
//! - [`telemetry`]: the tracing layer shared by the service binary.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::{
    AiLlmError, ConfigError, HttpError, Provider, ProviderError, ProviderErrorKind,
};
pub use service_profiles::LlmServiceProfiles;
pub use services::open_ai_service::OpenAiService;
