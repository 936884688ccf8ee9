//! Unified error handling for the login server.
//!
//! This module provides a centralized error type that implements `IntoResponse`,
//! allowing handlers to use `?` operator naturally while returning appropriate
//! HTTP status codes and error messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::oauth::ProviderError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Generic internal error, including user store failures
    #[error("{0}")]
    Internal(#[from] anyhow::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// The provider redirected back with an `error` parameter
    #[error("Authentication failed: {0}")]
    AuthorizationDenied(String),

    /// Code exchange, token verification or userinfo lookup failed
    #[error("{message}: {source}")]
    Provider {
        message: String,
        #[source]
        source: ProviderError,
    },

    /// Environment variable missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Authentication required but not provided
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials provided but rejected
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Create a config error for missing env vars
    pub fn missing_env(var_name: &str) -> Self {
        ApiError::Config(format!("{} environment variable must be set", var_name))
    }

    /// Wrap a provider failure with the message shown to the client
    pub fn provider(message: impl Into<String>, source: ProviderError) -> Self {
        ApiError::Provider {
            message: message.into(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(Value::String(e.to_string())),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::AuthorizationDenied(reason) => {
                tracing::warn!("OAuth error returned by provider: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    "Authentication failed".to_string(),
                    Some(Value::String(reason.clone())),
                )
            }
            ApiError::Provider { message, source } => {
                tracing::error!("{}: {}", message, source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message.clone(),
                    Some(source.details()),
                )
            }
            ApiError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                    None,
                )
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
