use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::screening::source::SourceError;
use crate::screening::validator::ValidationError;

/// Caller-facing error taxonomy for the screening pipeline.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    #[error("LLM API error: {message}")]
    Upstream { message: String, timed_out: bool },

    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Misconfigured(_)
            | AppError::MalformedResponse(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Misconfigured(_) => "MISCONFIGURED",
            AppError::Upstream { timed_out: true, .. } => "UPSTREAM_TIMEOUT",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            AppError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => {
                AppError::Misconfigured(LlmError::MissingApiKey.to_string())
            }
            LlmError::Timeout(message) => AppError::Upstream {
                message,
                timed_out: true,
            },
            LlmError::Api { message, .. } => AppError::Upstream {
                message,
                timed_out: false,
            },
            other => AppError::Upstream {
                message: other.to_string(),
                timed_out: false,
            },
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Upstream { .. } => self.to_string(),
            AppError::Misconfigured(msg) => {
                tracing::error!("Configuration error: {msg}");
                "The screening service is not configured correctly".to_string()
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed LLM response: {msg}");
                "Failed to process the LLM response".to_string()
            }
            AppError::Unexpected(e) => {
                tracing::error!("Unexpected error: {e:?}");
                "Failed to process the screening".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
