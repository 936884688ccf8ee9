//! Building `Set-Cookie` values and reading cookies from requests.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use cookie::{time::Duration, Cookie, SameSite};

use super::types::SessionConfig;

/// Cookie holding the provider's raw ID token (Cognito flow).
pub const ID_TOKEN_COOKIE: &str = "id_token";
pub const ID_TOKEN_MAX_AGE_SECS: i64 = 60 * 60;

/// Session cookie carrying a signed session token.
pub fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(Duration::seconds(config.ttl_secs))
        .build()
}

/// Cookie holding a raw ID token for an hour.
pub fn id_token_cookie(id_token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((ID_TOKEN_COOKIE, id_token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .max_age(Duration::seconds(ID_TOKEN_MAX_AGE_SECS))
        .build()
}

/// Cookie that makes the browser drop `name`.
pub fn removal_cookie(name: impl Into<String>) -> Cookie<'static> {
    let mut cookie = Cookie::build((name.into(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

/// Append a `Set-Cookie` header to a response.
pub fn append_cookie(response: &mut Response, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!("Dropping unencodable cookie {}: {}", cookie.name(), e),
    }
}

/// Value of the cookie called `name`, if the request carries one.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for cookie_header in headers.get_all(header::COOKIE) {
        let Ok(cookie_header) = cookie_header.to_str() else {
            continue;
        };

        for cookie_str in cookie_header.split(';') {
            if let Ok(cookie) = Cookie::parse(cookie_str.trim()) {
                if cookie.name() == name {
                    return Some(cookie.value().to_string());
                }
            }
        }
    }

    None
}

/// Token from the `Authorization: Bearer` header.
pub fn read_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}
