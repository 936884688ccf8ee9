//! Authentication module: provider login flows and signed session cookies.
//!
//! This module provides:
//! - Google and Cognito redirect/callback handlers
//! - Session token creation and validation
//! - `require_auth` middleware for protecting routes
//! - OAuth `state` issuance and checking

mod cognito;
pub mod cookies;
mod csrf;
mod google;
mod handlers;
pub mod jwt;
mod middleware;
pub mod types;

use serde::Deserialize;

pub use cognito::{cognito_callback, cognito_login};
pub use google::{google_callback, google_login};
pub use handlers::{auth_logout, auth_profile};
pub use middleware::{extract_auth_user, require_auth};

/// Query parameters a provider sends back to a callback
#[derive(Debug, Deserialize)]
pub struct AuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}
