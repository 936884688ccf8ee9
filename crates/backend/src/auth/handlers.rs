//! Session HTTP handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use shared_types::{MessageResponse, ProfileResponse};

use crate::AppState;

use super::cookies::{append_cookie, removal_cookie, ID_TOKEN_COOKIE};
use super::types::AuthUser;

/// Get the profile of the signed-in user.
pub async fn auth_profile(Extension(user): Extension<AuthUser>) -> Json<ProfileResponse> {
    tracing::info!("Profile request from user: {}", user.email);
    Json(user.into())
}

/// Logout - clear session cookies.
pub async fn auth_logout(State(state): State<AppState>) -> Response {
    let mut response = Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
    .into_response();

    append_cookie(&mut response, &removal_cookie(state.session.cookie_name.clone()));
    append_cookie(&mut response, &removal_cookie(ID_TOKEN_COOKIE));
    response
}
