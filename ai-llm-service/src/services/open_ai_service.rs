//! OpenAI REST client used for query embeddings and answer generation.
//!
//! Both calls are single, non-streaming POSTs under `LlmModelConfig::endpoint`:
//! `/v1/embeddings` turns one query into one vector, `/v1/chat/completions`
//! turns the assembled prompt into one answer. Failures come back as
//! [`AiLlmError`] so callers can tell transport, status and payload problems
//! apart.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
    },
};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// OpenAI client bound to one model profile.
///
/// Authorization and timeout are baked into the inner `reqwest::Client`, so a
/// single instance serves every request of its profile.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Builds the client for `cfg`.
    ///
    /// Fails with `MissingApiKey` when no key is configured, `InvalidEndpoint`
    /// when the endpoint is not an http(s) URL, and `HttpTransport` when the
    /// underlying client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| openai(ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(openai(ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone())).into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let bearer = header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            openai(ProviderErrorKind::Decode(format!(
                "API key is not a valid header value: {e}"
            )))
        })?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/');
        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            base_url = base,
            timeout_secs = timeout.as_secs(),
            "openai client ready"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Model identifier this client was configured with.
    pub fn model(&self) -> &str {
        &self.cfg.model
    }

    /// Generates one answer for `prompt`, preceded by `system` when given.
    ///
    /// `temperature` and `max_tokens` are sent only when the profile sets them.
    /// A response whose choices carry no text is `EmptyChoices`.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system);

        let out: ChatCompletionResponse = self
            .post_json(&self.url_chat, &body, "chat completion", started)
            .await?;
        let answer = out
            .first_content()
            .ok_or_else(|| openai(ProviderErrorKind::EmptyChoices))?;

        info!(
            model = %self.cfg.model,
            prompt_chars = prompt.len(),
            answer_chars = answer.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "answer generated"
        );
        Ok(answer)
    }

    /// Embeds `input` and returns the first vector of the response.
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        let out: EmbeddingsResponse = self
            .post_json(&self.url_embeddings, &body, "embedding", started)
            .await?;
        let vector = out
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .ok_or_else(|| {
                openai(ProviderErrorKind::Decode(
                    "embedding response has no `data` items".into(),
                ))
            })?;

        debug!(
            model = %self.cfg.model,
            dimensions = vector.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "query embedded"
        );
        Ok(vector)
    }

    /// POSTs `body` as JSON and decodes a 2xx reply into `T`.
    async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        call: &'static str,
        started: Instant,
    ) -> Result<T, AiLlmError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        debug!(model = %self.cfg.model, call, "POST {url}");
        let resp = self.client.post(url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            error!(
                call,
                %status,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis() as u64,
                "openai rejected request"
            );
            return Err(openai(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }))
            .into());
        }

        resp.json::<T>().await.map_err(|e| {
            error!(call, error = %e, model = %self.cfg.model, "openai reply not understood");
            AiLlmError::from(openai(ProviderErrorKind::Decode(format!("{call} reply: {e}"))))
        })
    }
}

fn openai(kind: ProviderErrorKind) -> ProviderError {
    ProviderError::new(Provider::OpenAI, kind)
}

/* ===========================================================================
Wire types
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let messages = system
            .map(|content| ChatMessage {
                role: "system",
                content,
            })
            .into_iter()
            .chain([ChatMessage {
                role: "user",
                content: prompt,
            }])
            .collect();

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice that has any.
    fn first_content(self) -> Option<String> {
        self.choices.into_iter().find_map(|c| c.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}
