//! OpenID Connect ID token verification.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::{JwksCache, ProviderError};

/// `aud` claim, which may be a single client id or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, client_id: &str) -> bool {
        match self {
            Audience::Single(aud) => aud == client_id,
            Audience::Many(auds) => auds.iter().any(|aud| aud == client_id),
        }
    }
}

/// Claims read from a verified ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Verify an RS256-signed ID token against the provider's key set.
///
/// Checks signature, expiry, issuer (any of `issuers`) and audience.
pub async fn verify_id_token(
    token: &str,
    jwks: &JwksCache,
    issuers: &[&str],
    audience: &str,
) -> Result<IdTokenClaims, ProviderError> {
    let header = decode_header(token)?;
    let jwk = jwks.find(header.kid.as_deref()).await?;
    let key = DecodingKey::from_jwk(&jwk)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[audience]);
    validation.set_issuer(issuers);
    validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

    let data = decode::<IdTokenClaims>(token, &key, &validation)?;
    Ok(data.claims)
}
