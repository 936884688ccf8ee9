//! AWS Cognito Hosted UI client.

use crate::config::CognitoConfig;
use crate::oauth::{
    authorization_url, exchange_code, verify_id_token, IdTokenClaims, JwksCache, ProviderError,
    TokenRequest,
};

/// Tokens from the Cognito token endpoint; only the ID token is required
#[derive(Debug, Clone)]
pub struct CognitoTokens {
    pub id_token: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

pub struct CognitoClient {
    config: CognitoConfig,
    http: reqwest::Client,
    jwks: Option<JwksCache>,
}

impl CognitoClient {
    pub fn new(config: CognitoConfig, http: reqwest::Client) -> Self {
        let jwks = config
            .issuer
            .as_ref()
            .map(|issuer| JwksCache::new(http.clone(), format!("{}/.well-known/jwks.json", issuer)));
        Self { config, http, jwks }
    }

    pub fn config(&self) -> &CognitoConfig {
        &self.config
    }

    /// URL of the Hosted UI `/oauth2/authorize` endpoint.
    pub fn authorization_url(&self, state: &str) -> String {
        let redirect_uri = self.config.redirect_uri();
        authorization_url(
            &format!("{}/oauth2/authorize", self.config.domain),
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("scope", self.config.scopes.as_str()),
                ("state", state),
            ],
        )
    }

    pub async fn exchange_code(&self, code: &str) -> Result<CognitoTokens, ProviderError> {
        let redirect_uri = self.config.redirect_uri();
        let request = TokenRequest::authorization_code(
            &self.config.client_id,
            &self.config.client_secret,
            &redirect_uri,
            code,
        );
        let token_url = format!("{}/oauth2/token", self.config.domain);
        let tokens = exchange_code(&self.http, &token_url, &request).await?;

        let id_token = tokens.id_token.ok_or_else(|| {
            ProviderError::MissingToken("Failed to retrieve ID token from Cognito".to_string())
        })?;

        Ok(CognitoTokens {
            id_token,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    /// Verify the ID token against the user pool's keys.
    ///
    /// Returns `Ok(None)` when no issuer is configured; the token is then
    /// passed to the browser unverified.
    pub async fn verify_id_token(
        &self,
        id_token: &str,
    ) -> Result<Option<IdTokenClaims>, ProviderError> {
        let (Some(jwks), Some(issuer)) = (self.jwks.as_ref(), self.config.issuer.as_deref()) else {
            return Ok(None);
        };

        let claims = verify_id_token(id_token, jwks, &[issuer], &self.config.client_id).await?;
        Ok(Some(claims))
    }
}
