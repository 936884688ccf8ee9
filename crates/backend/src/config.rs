//! Server configuration loaded from flags and environment variables.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::error::ApiError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Longest accepted session lifetime, one year.
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Parser)]
#[command(name = "login-server")]
#[command(about = "OAuth 2.0 / OpenID Connect login server for Google and Cognito")]
pub struct Settings {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Public base URL of this server. Defaults to http://localhost:PORT.
    #[arg(long, env = "SERVER_URL")]
    pub server_url: Option<String>,

    /// Deployment environment. "production" marks cookies as Secure.
    #[arg(long, env = "RUST_ENV", default_value = "development")]
    pub environment: String,

    /// Secret used to sign session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Name of the session cookie.
    #[arg(long, env = "COOKIE_KEY", default_value = "session")]
    pub cookie_name: String,

    /// Session token lifetime in seconds.
    #[arg(
        long,
        env = "SESSION_TTL_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_SECS)
    )]
    pub session_ttl_secs: i64,

    /// Where the browser is sent after a successful Google login.
    #[arg(long, env = "POST_LOGIN_REDIRECT", default_value = "/dashboard.html")]
    pub post_login_redirect: String,

    /// Directory of static files served at the site root.
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,

    /// Postgres URL for the user table. Users are kept in memory when unset.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Comma-separated list of origins allowed by CORS.
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub cors_allowed_origins: Vec<String>,

    #[command(flatten)]
    pub google: GoogleArgs,

    #[command(flatten)]
    pub cognito: CognitoArgs,
}

#[derive(Debug, Clone, Args)]
pub struct GoogleArgs {
    #[arg(id = "google_client_id", long = "google-client-id", env = "GOOGLE_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(
        id = "google_client_secret",
        long = "google-client-secret",
        env = "GOOGLE_CLIENT_SECRET",
        hide_env_values = true
    )]
    pub client_secret: Option<String>,

    /// Callback URL registered with Google. Defaults to SERVER_URL/auth/google/callback.
    #[arg(long = "google-redirect-uri", env = "GOOGLE_REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Optional `prompt` parameter, e.g. "consent".
    #[arg(long = "google-prompt", env = "GOOGLE_PROMPT")]
    pub prompt: Option<String>,

    #[arg(long = "google-auth-url", env = "GOOGLE_AUTH_URL", default_value = GOOGLE_AUTH_URL)]
    pub auth_url: String,

    #[arg(long = "google-token-url", env = "GOOGLE_TOKEN_URL", default_value = GOOGLE_TOKEN_URL)]
    pub token_url: String,

    #[arg(
        long = "google-userinfo-url",
        env = "GOOGLE_USERINFO_URL",
        default_value = GOOGLE_USERINFO_URL
    )]
    pub userinfo_url: String,

    #[arg(long = "google-jwks-url", env = "GOOGLE_JWKS_URL", default_value = GOOGLE_JWKS_URL)]
    pub jwks_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CognitoCallbackMode {
    /// Store the raw ID token in a cookie and redirect to the dashboard.
    Cookie,
    /// Return the ID token in a JSON body.
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct CognitoArgs {
    /// Hosted UI domain, e.g. https://my-app.auth.us-east-1.amazoncognito.com
    #[arg(long = "cognito-domain", env = "COGNITO_DOMAIN")]
    pub domain: Option<String>,

    #[arg(id = "cognito_client_id", long = "cognito-client-id", env = "COGNITO_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(
        id = "cognito_client_secret",
        long = "cognito-client-secret",
        env = "COGNITO_CLIENT_SECRET",
        hide_env_values = true
    )]
    pub client_secret: Option<String>,

    /// Base URL of the application; the callback lives at APP_BASE_URL/auth/callback.
    #[arg(long = "app-base-url", env = "APP_BASE_URL")]
    pub app_base_url: Option<String>,

    #[arg(
        long = "cognito-scopes",
        env = "COGNITO_SCOPES",
        default_value = "openid profile email phone"
    )]
    pub scopes: String,

    #[arg(
        long = "cognito-callback-mode",
        env = "COGNITO_CALLBACK_MODE",
        value_enum,
        default_value = "cookie"
    )]
    pub callback_mode: CognitoCallbackMode,

    /// User pool issuer URL. When set, ID tokens are verified against its JWKS.
    #[arg(long = "cognito-issuer", env = "COGNITO_ISSUER")]
    pub issuer: Option<String>,
}

/// Resolved Google client settings
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub prompt: Option<String>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    pub jwks_url: String,
}

/// Resolved Cognito client settings
#[derive(Debug, Clone)]
pub struct CognitoConfig {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub app_base_url: String,
    pub scopes: String,
    pub callback_mode: CognitoCallbackMode,
    pub issuer: Option<String>,
}

impl CognitoConfig {
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.app_base_url)
    }

    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.app_base_url)
    }
}

impl Settings {
    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Google settings, or `None` when no client id is configured.
    pub fn google_config(&self) -> Result<Option<GoogleConfig>, ApiError> {
        let args = &self.google;
        let Some(client_id) = non_empty(&args.client_id) else {
            return Ok(None);
        };
        let client_secret =
            non_empty(&args.client_secret).ok_or_else(|| ApiError::missing_env("GOOGLE_CLIENT_SECRET"))?;

        let redirect_uri = non_empty(&args.redirect_uri)
            .unwrap_or_else(|| format!("{}/auth/google/callback", self.server_url()));

        Ok(Some(GoogleConfig {
            client_id,
            client_secret,
            redirect_uri,
            prompt: non_empty(&args.prompt),
            auth_url: args.auth_url.clone(),
            token_url: args.token_url.clone(),
            userinfo_url: args.userinfo_url.clone(),
            jwks_url: args.jwks_url.clone(),
        }))
    }

    /// Cognito settings, or `None` when no client id is configured.
    pub fn cognito_config(&self) -> Result<Option<CognitoConfig>, ApiError> {
        let args = &self.cognito;
        let Some(client_id) = non_empty(&args.client_id) else {
            return Ok(None);
        };
        let client_secret = non_empty(&args.client_secret)
            .ok_or_else(|| ApiError::missing_env("COGNITO_CLIENT_SECRET"))?;
        let domain =
            non_empty(&args.domain).ok_or_else(|| ApiError::missing_env("COGNITO_DOMAIN"))?;
        let app_base_url =
            non_empty(&args.app_base_url).ok_or_else(|| ApiError::missing_env("APP_BASE_URL"))?;

        Ok(Some(CognitoConfig {
            domain: domain.trim_end_matches('/').to_string(),
            client_id,
            client_secret,
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
            scopes: args.scopes.clone(),
            callback_mode: args.callback_mode,
            issuer: non_empty(&args.issuer).map(|s| s.trim_end_matches('/').to_string()),
        }))
    }

    /// Reject settings that cannot produce a working server.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ApiError::missing_env("JWT_SECRET"));
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ApiError::missing_env("COOKIE_KEY"));
        }
        if !(1..=MAX_SESSION_TTL_SECS).contains(&self.session_ttl_secs) {
            return Err(ApiError::Config(format!(
                "SESSION_TTL_SECS must be between 1 and {}",
                MAX_SESSION_TTL_SECS
            )));
        }
        if self.google_config()?.is_none() && self.cognito_config()?.is_none() {
            return Err(ApiError::Config(
                "at least one of GOOGLE_CLIENT_ID or COGNITO_CLIENT_ID must be set".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
