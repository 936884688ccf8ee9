//! Provider-agnostic OAuth 2.0 / OIDC plumbing: authorization URLs,
//! authorization-code exchange, JWKS caching and ID token verification.

mod exchange;
mod jwks;
mod verify;

use serde_json::Value;
use thiserror::Error;

pub(crate) use exchange::ensure_success;
pub use exchange::{authorization_url, exchange_code, TokenRequest, TokenResponse};
pub use jwks::JwksCache;
pub use verify::{verify_id_token, Audience, IdTokenClaims};

/// Failure talking to an identity provider or validating what it returned.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        body: Value,
    },

    #[error("{0}")]
    MissingToken(String),

    #[error("invalid ID token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("no signing key found for kid {0:?}")]
    UnknownKey(Option<String>),
}

impl ProviderError {
    /// Value placed in the `details` field of the error response.
    ///
    /// Provider error bodies are passed through so the caller can see
    /// e.g. `invalid_grant`; everything else is reduced to its message.
    pub fn details(&self) -> Value {
        match self {
            ProviderError::Status { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}
