//! Authentication middleware layer for protecting routes.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::AppState;

use super::cookies::{read_bearer, read_cookie};
use super::jwt;
use super::types::{AuthUser, SessionConfig};

/// Middleware function that requires a valid session.
///
/// On success the `AuthUser` is stored in the request extensions. Use with
/// `axum::middleware::from_fn_with_state`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match extract_auth_user(request.headers(), &state.session) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Extract and validate the user from request headers.
///
/// The session cookie is preferred; an `Authorization: Bearer` header is
/// accepted for API clients.
pub fn extract_auth_user(headers: &HeaderMap, config: &SessionConfig) -> Result<AuthUser, ApiError> {
    let token = read_cookie(headers, &config.cookie_name)
        .or_else(|| read_bearer(headers))
        .ok_or_else(|| ApiError::Unauthorized("Access token is missing".to_string()))?;

    let claims = jwt::validate_token(config, &token).map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        ApiError::Forbidden("Invalid or expired token".to_string())
    })?;

    Ok(claims.into())
}
