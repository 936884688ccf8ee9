//! OAuth `state` parameter: issued with the redirect, checked on callback.

use axum::http::HeaderMap;
use cookie::{time::Duration, Cookie, SameSite};

use super::cookies::read_cookie;
use crate::error::ApiError;

pub const STATE_COOKIE: &str = "oauth_state";
const STATE_MAX_AGE_SECS: i64 = 10 * 60;

/// Fresh random state value.
pub fn new_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Short-lived cookie remembering the state sent to the provider.
pub fn state_cookie(state: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE, state.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(STATE_MAX_AGE_SECS))
        .build()
}

/// The state returned by the provider must match the one in our cookie.
pub fn verify_state(headers: &HeaderMap, returned: Option<&str>) -> Result<(), ApiError> {
    let expected = read_cookie(headers, STATE_COOKIE);

    match (expected.as_deref(), returned) {
        (Some(expected), Some(returned)) if !expected.is_empty() && expected == returned => Ok(()),
        _ => {
            tracing::warn!("OAuth state mismatch on callback");
            Err(ApiError::bad_request("Invalid OAuth state"))
        }
    }
}
