//! Auth-related types and configuration.

use serde::{Deserialize, Serialize};

pub use shared_types::ProfileResponse;

use crate::config::Settings;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (provider user id)
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub verified_email: Option<bool>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Validated user from the session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub verified_email: Option<bool>,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        AuthUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            verified_email: claims.verified_email,
        }
    }
}

impl From<AuthUser> for ProfileResponse {
    fn from(user: AuthUser) -> Self {
        ProfileResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            picture: user.picture,
            verified_email: user.verified_email,
        }
    }
}

/// Session signing and cookie settings
#[derive(Clone)]
pub struct SessionConfig {
    pub jwt_secret: String,
    pub cookie_name: String,
    pub ttl_secs: i64,
    /// Adds the `Secure` attribute to every cookie we set.
    pub secure: bool,
}

impl SessionConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            cookie_name: settings.cookie_name.clone(),
            ttl_secs: settings.session_ttl_secs,
            secure: settings.is_production(),
        }
    }
}
