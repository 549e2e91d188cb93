//! Default OpenAI configs loaded strictly from environment variables.
//!
//! Two roles are supported:
//!
//! - **Chat**      → answer generation
//! - **Embedding** → query embeddings for vector search
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`   = API key (mandatory)
//! - `OPENAI_URL`       = API base URL (default `https://api.openai.com`)
//! - `LLM_MODEL`        = chat model (default `gpt-4`)
//! - `EMBEDDING_MODEL`  = embedding model (default `text-embedding-3-small`)
//! - `LLM_TEMPERATURE`  = chat sampling temperature (default `0.7`, `0.0..=2.0`)
//! - `LLM_MAX_TOKENS`   = chat output cap (default `1500`)
//! - `LLM_TIMEOUT_SECS` = request timeout for both roles (default `60`)

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, ConfigError, env_opt_f32, env_opt_u32, env_or, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolves and validates the OpenAI base URL.
fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url.trim_end_matches('/').to_string())
}

fn timeout_secs() -> Result<u64, AiLlmError> {
    Ok(env_opt_u32("LLM_TIMEOUT_SECS")?
        .map(u64::from)
        .unwrap_or(DEFAULT_TIMEOUT_SECS))
}

fn model(var: &'static str, default: &str) -> Result<String, AiLlmError> {
    let model = env_or(var, default);
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    Ok(model)
}

/// Constructs the **chat** profile used for answer generation.
///
/// # Defaults
/// - `temperature = Some(0.7)`
/// - `max_tokens = Some(1500)`
pub fn config_openai_chat() -> Result<LlmModelConfig, AiLlmError> {
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        model: model("LLM_MODEL", DEFAULT_CHAT_MODEL)?,
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(temperature),
        timeout_secs: Some(timeout_secs()?),
    })
}

/// Constructs the **embedding** profile used for query vectors.
///
/// Sampling knobs do not apply to embeddings and stay `None`.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        model: model("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL)?,
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        timeout_secs: Some(timeout_secs()?),
    })
}
