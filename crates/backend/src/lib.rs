//! OAuth 2.0 / OpenID Connect login server for Google and AWS Cognito.
//!
//! Each provider gets a redirect endpoint that sends the browser to the
//! consent screen and a callback endpoint that exchanges the authorization
//! code server-to-server. Google logins end with a locally signed session
//! cookie; Cognito logins hand the provider's ID token to the browser.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
mod db;
pub mod error;
mod handlers;
mod models;
pub mod oauth;
pub mod providers;
mod schema;
pub mod users;

#[cfg(test)]
mod test_support;

use crate::auth::types::SessionConfig;
use crate::config::Settings;
use crate::error::ApiError;
use crate::providers::{CognitoClient, GoogleClient};
use crate::users::{MemoryUserStore, PgUserStore, UserStore};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub session: Arc<SessionConfig>,
    pub google: Option<Arc<GoogleClient>>,
    pub cognito: Option<Arc<CognitoClient>>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Build provider clients and the user store from validated settings.
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("login-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let google = settings.google_config()?.map(|config| {
            tracing::info!("Google login enabled (client {})", config.client_id);
            Arc::new(GoogleClient::new(config, http.clone()))
        });
        let cognito = settings.cognito_config()?.map(|config| {
            tracing::info!("Cognito login enabled (domain {})", config.domain);
            if config.issuer.is_none() {
                tracing::warn!("COGNITO_ISSUER not set, Cognito ID tokens will not be verified");
            }
            Arc::new(CognitoClient::new(config, http.clone()))
        });

        let users: Arc<dyn UserStore> = match settings.database_url.as_deref() {
            Some(url) => Arc::new(PgUserStore::new(db::establish_connection_pool(url)?)),
            None => {
                tracing::warn!("DATABASE_URL not set, keeping users in memory");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self {
            session: Arc::new(SessionConfig::from_settings(&settings)),
            settings: Arc::new(settings),
            google,
            cognito,
            users,
        })
    }

    pub fn google_client(&self) -> Result<&GoogleClient, ApiError> {
        self.google
            .as_deref()
            .ok_or_else(|| ApiError::missing_env("GOOGLE_CLIENT_ID"))
    }

    pub fn cognito_client(&self) -> Result<&CognitoClient, ApiError> {
        self.cognito
            .as_deref()
            .ok_or_else(|| ApiError::missing_env("COGNITO_CLIENT_ID"))
    }
}

/// Assemble the HTTP routes. Provider routes are mounted only for
/// configured providers; everything else falls through to static files.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/profile", get(auth::auth_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/logout", post(auth::auth_logout))
        .merge(protected);

    if state.google.is_some() {
        app = app
            .route("/auth/google", get(auth::google_login))
            .route("/auth/google/callback", get(auth::google_callback));
    }
    if state.cognito.is_some() {
        app = app
            .route("/auth/cognito", get(auth::cognito_login))
            .route("/auth/callback", get(auth::cognito_callback));
    }

    let public_dir = state.settings.public_dir.clone();
    let app = app
        .layer(build_cors_layer(&state.settings.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if public_dir.exists() {
        tracing::info!("Serving static files from {}", public_dir.display());
        app.fallback_service(ServeDir::new(public_dir))
    } else {
        tracing::info!(
            "Static directory not found at {}, serving API only",
            public_dir.display()
        );
        app
    }
}

/// Build CORS layer from the configured origins.
///
/// If origins are given, only those are allowed (with credentials).
/// Otherwise CORS is permissive, which is only suitable for development.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
