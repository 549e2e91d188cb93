use ai_llm_service::{AiLlmError, ConfigError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use rag_store::RagError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("startup check failed: {0}")]
    Startup(#[source] ContextorError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / pipeline ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Query(#[from] ContextorError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Query(e) if e.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // startup-only
            AppError::MissingEnv(_)
            | AppError::Config(_)
            | AppError::Startup(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Startup(_) => "STARTUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Query(e) => e.kind(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        match err {
            AiLlmError::Config(ConfigError::MissingVar(var)) => AppError::MissingEnv(var),
            other => AppError::Config(other.to_string()),
        }
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        AppError::Config(err.to_string())
    }
}
