//! Authorization URL construction and the code-for-token exchange.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ProviderError;

/// Form body posted to a token endpoint.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    code: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn authorization_code(
        client_id: &'a str,
        client_secret: &'a str,
        redirect_uri: &'a str,
        code: &'a str,
    ) -> Self {
        Self {
            grant_type: "authorization_code",
            client_id,
            client_secret,
            redirect_uri,
            code,
        }
    }
}

/// Token endpoint response. Providers differ in which fields they return,
/// so callers decide which ones are mandatory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Append percent-encoded query parameters to an authorization endpoint.
pub fn authorization_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

/// Exchange an authorization code at `token_url`.
pub async fn exchange_code(
    http: &reqwest::Client,
    token_url: &str,
    request: &TokenRequest<'_>,
) -> Result<TokenResponse, ProviderError> {
    let response = http.post(token_url).form(request).send().await?;
    let response = ensure_success(response).await?;

    Ok(response.json::<TokenResponse>().await?)
}

/// Turn a non-2xx provider response into `ProviderError::Status`, keeping
/// the body (as JSON when it parses) for the error details.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    tracing::warn!("Provider request failed: {} - {}", status, body);

    Err(ProviderError::Status { status, body })
}
