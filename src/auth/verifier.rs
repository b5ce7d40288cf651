//! RS256 access-token verification backed by the tenant's JWKS.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use log::{debug, error, warn};
use moka::future::Cache;
use serde::de::DeserializeOwned;

use crate::auth::AuthError;
use crate::models::config::Auth0ServerConfig;

/// Provider of the public keys tokens are checked against.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Current key set. `refresh` asks for a fresh copy; sources may
    /// throttle how often they honour it.
    async fn keys(&self, refresh: bool) -> Result<Arc<JwkSet>, AuthError>;
}

/// Fixed key set.
#[derive(Clone, Debug)]
pub struct StaticKeys(Arc<JwkSet>);

impl StaticKeys {
    pub fn new(keys: JwkSet) -> Self {
        Self(Arc::new(keys))
    }
}

#[async_trait]
impl KeySource for StaticKeys {
    async fn keys(&self, _refresh: bool) -> Result<Arc<JwkSet>, AuthError> {
        Ok(self.0.clone())
    }
}

#[derive(Clone)]
struct FetchedKeys {
    keys: Arc<JwkSet>,
    fetched_at: Instant,
}

/// Keys fetched from `/.well-known/jwks.json` and cached for `ttl`.
///
/// Concurrent misses share one request. Forced refreshes are at least
/// `min_refresh` apart; a refresh asked for sooner gets the cached set.
pub struct JwksClient {
    url: String,
    http: reqwest::Client,
    min_refresh: Duration,
    cache: Cache<String, FetchedKeys>,
}

impl JwksClient {
    pub fn new(url: String, ttl: Duration, min_refresh: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        let cache = Cache::builder().time_to_live(ttl).max_capacity(1).build();

        Ok(Self {
            url,
            http,
            min_refresh,
            cache,
        })
    }

    async fn request(&self) -> Result<JwkSet, reqwest::Error> {
        self.http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await
    }

    async fn fetch(&self) -> Result<FetchedKeys, AuthError> {
        debug!("Fetching JWKS from {}", self.url);
        let keys = self.request().await.map_err(|e| {
            error!("Failed to fetch JWKS from {}: {e}", self.url);
            AuthError::KeysUnavailable
        })?;
        if keys.keys.is_empty() {
            error!("JWKS at {} contains no keys", self.url);
            return Err(AuthError::KeysUnavailable);
        }

        Ok(FetchedKeys {
            keys: Arc::new(keys),
            fetched_at: Instant::now(),
        })
    }
}

#[async_trait]
impl KeySource for JwksClient {
    async fn keys(&self, refresh: bool) -> Result<Arc<JwkSet>, AuthError> {
        if refresh {
            match self.cache.get(&self.url).await {
                Some(cached) if cached.fetched_at.elapsed() < self.min_refresh => {
                    debug!("JWKS refreshed {:?} ago, reusing it", cached.fetched_at.elapsed());
                    return Ok(cached.keys);
                }
                _ => self.cache.invalidate(&self.url).await,
            }
        }

        let fetched = self
            .cache
            .try_get_with(self.url.clone(), self.fetch())
            .await
            .map_err(|e| e.as_ref().clone())?;
        Ok(fetched.keys)
    }
}

/// Validates signature, audience, issuer and expiry of access tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(
        keys: Arc<dyn KeySource>,
        audience: &str,
        issuer: &str,
        algorithms: &[Algorithm],
        leeway_secs: u64,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        if !algorithms.is_empty() {
            validation.algorithms = algorithms.to_vec();
        }
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = leeway_secs;

        Self { keys, validation }
    }

    /// Verifier backed by the tenant's published JWKS.
    pub fn from_config(config: &Auth0ServerConfig) -> Result<Self, reqwest::Error> {
        let client = JwksClient::new(
            config.jwks_url(),
            Duration::from_secs(config.jwks_cache_ttl_secs),
            Duration::from_secs(config.jwks_min_refresh_secs),
        )?;

        Ok(Self::new(
            Arc::new(client),
            &config.audience,
            &config.issuer(),
            &config.algorithms,
            config.leeway_secs,
        ))
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let keys = self.keys.keys(false).await?;
        if let Some(key) = keys.find(kid) {
            return Ok(key.clone());
        }

        // Keys may have rotated since the cached copy was fetched.
        let keys = self.keys.keys(true).await?;
        keys.find(kid).cloned().ok_or(AuthError::UnknownKey)
    }

    /// Decode `token` into `C` once every check passes.
    pub async fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::Malformed)?;
        let kid = header.kid.ok_or(AuthError::Malformed)?;

        let jwk = self.find_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|_| AuthError::Unparsable)?;

        let data = decode::<C>(token, &key, &self.validation).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                _ => AuthError::Unparsable,
            };
            warn!("Rejected token with key {kid}: {e}");
            err
        })?;

        Ok(data.claims)
    }
}
