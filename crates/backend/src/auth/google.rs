//! Google login: consent redirect and callback.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use shared_types::Provider;

use crate::error::{ApiError, ApiResult};
use crate::handlers::found;
use crate::users::NewUser;
use crate::AppState;

use super::cookies::{append_cookie, removal_cookie, session_cookie};
use super::types::AuthUser;
use super::{csrf, jwt, AuthCallbackParams};

/// Start Google OAuth login flow by redirecting to the consent screen.
pub async fn google_login(State(state): State<AppState>) -> ApiResult<Response> {
    let google = state.google_client()?;

    let csrf_state = csrf::new_state();
    let auth_url = google.authorization_url(&csrf_state);
    tracing::info!("Redirecting to Google OAuth: {}", google.config().auth_url);

    let mut response = found(&auth_url);
    append_cookie(
        &mut response,
        &csrf::state_cookie(&csrf_state, state.session.secure),
    );
    Ok(response)
}

/// Handle Google OAuth callback.
///
/// Exchanges the authorization code for tokens, verifies the ID token,
/// looks up the profile, records the user and sets the session cookie.
pub async fn google_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AuthCallbackParams>,
) -> Response {
    let mut response = match handle_callback_inner(&state, &headers, params).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    append_cookie(&mut response, &removal_cookie(csrf::STATE_COOKIE));
    response
}

async fn handle_callback_inner(
    state: &AppState,
    headers: &HeaderMap,
    params: AuthCallbackParams,
) -> Result<Response, ApiError> {
    if let Some(error) = params.error {
        return Err(ApiError::AuthorizationDenied(error));
    }

    let code = params.code.filter(|c| !c.is_empty()).ok_or_else(|| {
        tracing::error!("No authorization code received");
        ApiError::bad_request("No authorization code received")
    })?;

    csrf::verify_state(headers, params.state.as_deref())?;

    let google = state.google_client()?;
    let failed = |e| ApiError::provider("Authentication failed", e);

    let tokens = google.exchange_code(&code).await.map_err(failed)?;
    let claims = google.verify_id_token(&tokens.id_token).await.map_err(failed)?;
    let user_info = google
        .fetch_userinfo(&tokens.access_token)
        .await
        .map_err(failed)?;

    tracing::info!("OAuth login from Google user {}", claims.sub);

    let user = state
        .users
        .get_or_create(NewUser {
            sub: claims.sub,
            provider: Provider::Google,
            email: claims.email.or_else(|| Some(user_info.email.clone())),
            name: claims.name.or_else(|| user_info.name.clone()),
        })
        .await?;
    tracing::debug!("User record {} created at {}", user.pk, user.created_at);

    let session_user = AuthUser {
        id: user_info.id,
        email: user_info.email,
        name: user_info.name,
        picture: user_info.picture,
        verified_email: user_info.verified_email,
    };
    let token = jwt::create_token(&state.session, &session_user)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Failed to create token: {}", e)))?;

    let redirect_to = &state.settings.post_login_redirect;
    let mut response = found(redirect_to);
    append_cookie(&mut response, &session_cookie(&state.session, token));

    tracing::info!("Authentication successful, redirecting to {}", redirect_to);
    Ok(response)
}
