use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::profile::ValidationErrors;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const CREDITS_EXHAUSTED_MESSAGE: &str = "AI usage limit reached. Please add credits.";
pub const GATEWAY_ERROR_MESSAGE: &str = "AI gateway error";
pub const NO_TOOL_CALL_MESSAGE: &str = "No tool call in AI response";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Upstream rate limit")]
    RateLimited,

    #[error("Upstream credits exhausted")]
    CreditsExhausted,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("No tool call in AI response")]
    NoToolCall,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status: 429, .. } => AppError::RateLimited,
            LlmError::Api { status: 402, .. } => AppError::CreditsExhausted,
            LlmError::NoToolCall => AppError::NoToolCall,
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    "AI gateway credential is not configured".to_string(),
                )
            }
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                RATE_LIMIT_MESSAGE.to_string(),
            ),
            AppError::CreditsExhausted => (
                StatusCode::PAYMENT_REQUIRED,
                "CREDITS_EXHAUSTED",
                CREDITS_EXHAUSTED_MESSAGE.to_string(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GATEWAY_ERROR",
                    GATEWAY_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::NoToolCall => {
                tracing::error!("AI response carried no tool call");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NO_TOOL_CALL",
                    NO_TOOL_CALL_MESSAGE.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        error_response(status, code, message)
    }
}

/// Builds the `{"error": ..., "code": ...}` body every failure path shares.
pub fn error_response(status: StatusCode, code: &str, message: String) -> Response {
    let body = Json(json!({
        "error": message,
        "code": code,
    }));

    (status, body).into_response()
}

/// Turns a handler panic into a 500 carrying the panic message.
/// Installed through `CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    tracing::error!("Handler panicked: {message}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
}
