//! Google OAuth 2.0 / OpenID Connect client.

use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::oauth::{
    authorization_url, exchange_code, verify_id_token, IdTokenClaims, JwksCache, ProviderError,
    TokenRequest,
};

const SCOPES: &str = "openid email profile";
const ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Tokens Google must return for a login to proceed
#[derive(Debug, Clone)]
pub struct GoogleTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
}

/// Profile returned by the userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub verified_email: Option<bool>,
}

pub struct GoogleClient {
    config: GoogleConfig,
    http: reqwest::Client,
    jwks: JwksCache,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig, http: reqwest::Client) -> Self {
        let jwks = JwksCache::new(http.clone(), config.jwks_url.clone());
        Self { config, http, jwks }
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// URL of the Google consent screen for this client.
    pub fn authorization_url(&self, state: &str) -> String {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("access_type", "offline"),
        ];
        if let Some(prompt) = self.config.prompt.as_deref() {
            params.push(("prompt", prompt));
        }
        params.push(("state", state));

        authorization_url(&self.config.auth_url, &params)
    }

    /// Exchange the authorization code; both an access token and an ID token are required.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, ProviderError> {
        let request = TokenRequest::authorization_code(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.redirect_uri,
            code,
        );
        let tokens = exchange_code(&self.http, &self.config.token_url, &request).await?;

        match (tokens.access_token, tokens.id_token) {
            (Some(access_token), Some(id_token)) => Ok(GoogleTokens {
                access_token,
                id_token,
                refresh_token: tokens.refresh_token,
            }),
            _ => Err(ProviderError::MissingToken(
                "Failed to retrieve tokens from Google".to_string(),
            )),
        }
    }

    pub async fn verify_id_token(&self, id_token: &str) -> Result<IdTokenClaims, ProviderError> {
        verify_id_token(id_token, &self.jwks, &ISSUERS, &self.config.client_id).await
    }

    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, ProviderError> {
        let response = self
            .http
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = crate::oauth::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}
