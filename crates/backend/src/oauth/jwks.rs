//! Cached JSON Web Key Set for a provider.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;

use super::exchange::ensure_success;
use super::ProviderError;

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Signing keys fetched from a provider's JWKS endpoint.
///
/// Keys are kept for a TTL. A token signed with a `kid` that is not in the
/// cached set forces one refetch, which picks up provider key rotation.
pub struct JwksCache {
    url: String,
    http: reqwest::Client,
    ttl: Duration,
    cached: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http,
            ttl: DEFAULT_TTL,
            cached: RwLock::new(None),
        }
    }

    /// Find the key for `kid`, fetching the key set if needed.
    pub async fn find(&self, kid: Option<&str>) -> Result<Jwk, ProviderError> {
        if let Some(jwk) = self.cached_key(kid).await {
            return Ok(jwk);
        }

        let keys = self.refresh().await?;
        select_key(&keys, kid).ok_or_else(|| ProviderError::UnknownKey(kid.map(str::to_string)))
    }

    async fn cached_key(&self, kid: Option<&str>) -> Option<Jwk> {
        let guard = self.cached.read().await;
        let cached = guard.as_ref()?;
        if cached.fetched_at.elapsed() > self.ttl {
            return None;
        }
        select_key(&cached.keys, kid)
    }

    async fn refresh(&self) -> Result<JwkSet, ProviderError> {
        tracing::debug!("Fetching JWKS from {}", self.url);

        let response = self.http.get(&self.url).send().await?;
        let keys: JwkSet = ensure_success(response).await?.json().await?;

        let mut guard = self.cached.write().await;
        *guard = Some(CachedKeys {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }
}

/// Tokens without a `kid` are only accepted when the set holds exactly one key.
fn select_key(keys: &JwkSet, kid: Option<&str>) -> Option<Jwk> {
    match kid {
        Some(kid) => keys.find(kid).cloned(),
        None if keys.keys.len() == 1 => keys.keys.first().cloned(),
        None => None,
    }
}
