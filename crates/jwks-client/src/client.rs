//! JWKS client facade.
//!
//! Construction resolves the issuer's JWKS URI once through OIDC discovery.
//! Key lookups then go through the cache and fall back to fetching the full
//! key set on a miss.
//!
//! # Concurrency
//!
//! The only lock is the cache's. Cache hits proceed in parallel; concurrent
//! misses for the same `kid` may each fetch and insert, and the last insert
//! wins. The converted key for a given `kid` is the same either way.

use crate::cache::KeyCache;
use crate::config::CacheConfig;
use crate::error::JwksError;
use crate::fetcher::JwksFetcher;
use crate::key_lookup::KeyFn;
use crate::observability;
use crate::rsa_key::parse_rsa_public_key;
use crate::token::extract_kid;
use rsa::RsaPublicKey;
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

/// Client that resolves `kid`s to RSA public keys for one issuer.
pub struct JwksClient {
    /// Issuer URL the client was built for.
    issuer: String,

    /// JWKS endpoint resolved at construction.
    jwks_uri: String,

    /// HTTP fetcher for key sets.
    fetcher: JwksFetcher,

    /// Converted keys by `kid`. `None` when caching is disabled.
    cache: Option<KeyCache<Arc<RsaPublicKey>>>,
}

impl fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwksClient")
            .field("issuer", &self.issuer)
            .field("jwks_uri", &self.jwks_uri)
            .field("cache_enabled", &self.cache.is_some())
            .finish()
    }
}

impl JwksClient {
    /// Create a client for `issuer`, performing OIDC discovery.
    ///
    /// # Arguments
    ///
    /// * `issuer` - Issuer URL, e.g. `https://idp.example`
    /// * `cache_config` - Cache settings; no cache is created when disabled
    ///
    /// # Errors
    ///
    /// Returns `JwksError::InvalidConfig` if the cache settings are rejected,
    /// or `JwksError::Discovery` if the JWKS URI cannot be resolved.
    pub async fn new(issuer: impl Into<String>, cache_config: CacheConfig) -> Result<Self, JwksError> {
        Self::with_fetcher(issuer.into(), cache_config, JwksFetcher::new()?).await
    }

    /// Create a client that sends its requests through `http_client`.
    ///
    /// # Errors
    ///
    /// Same as [`JwksClient::new`].
    pub async fn with_http_client(
        issuer: impl Into<String>,
        cache_config: CacheConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, JwksError> {
        Self::with_fetcher(
            issuer.into(),
            cache_config,
            JwksFetcher::with_http_client(http_client),
        )
        .await
    }

    #[instrument(skip(cache_config, fetcher))]
    async fn with_fetcher(
        issuer: String,
        cache_config: CacheConfig,
        fetcher: JwksFetcher,
    ) -> Result<Self, JwksError> {
        cache_config.validate()?;

        let jwks_uri = fetcher.resolve_jwks_uri(&issuer).await?;

        let cache = cache_config
            .enabled
            .then(|| KeyCache::from_config(&cache_config));

        tracing::info!(
            target: "jwks.client",
            issuer = %issuer,
            jwks_uri = %jwks_uri,
            cache_enabled = cache_config.enabled,
            "JWKS client ready"
        );

        Ok(Self {
            issuer,
            jwks_uri,
            fetcher,
            cache,
        })
    }

    /// Issuer URL.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// JWKS URI resolved at construction.
    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Whether keys are cached.
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of keys currently stored in the cache (0 when disabled).
    pub async fn cached_key_count(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.len().await,
            None => 0,
        }
    }

    /// Get the RSA public key for `kid`.
    ///
    /// Returns the cached key if present and fresh. Otherwise fetches the
    /// key set, converts the first entry whose `kid` matches and caches it.
    ///
    /// # Errors
    ///
    /// - `JwksError::Fetch` if the key set cannot be retrieved
    /// - `JwksError::KeyNotFound` if no entry has this `kid`
    /// - `JwksError::KeyFormat` if the entry's key material is unusable
    ///
    /// Nothing is cached on failure.
    #[instrument(skip(self))]
    pub async fn get_public_key(&self, kid: &str) -> Result<Arc<RsaPublicKey>, JwksError> {
        let result = self.resolve_key(kid).await;
        if let Err(e) = &result {
            observability::record_key_lookup_error(e.kind());
        }
        result
    }

    async fn resolve_key(&self, kid: &str) -> Result<Arc<RsaPublicKey>, JwksError> {
        if let Some(cache) = &self.cache {
            if let Some(key) = cache.get(kid).await {
                tracing::debug!(target: "jwks.client", kid = %kid, "Key cache hit");
                observability::record_cache_lookup(true);
                return Ok(key);
            }
            observability::record_cache_lookup(false);
        }

        let key_set = self.fetcher.fetch_key_set(&self.jwks_uri).await?;

        let jwk = key_set.find(kid).ok_or_else(|| {
            tracing::warn!(
                target: "jwks.client",
                kid = %kid,
                key_count = key_set.keys.len(),
                "Key not found in JWKS"
            );
            JwksError::KeyNotFound(kid.to_string())
        })?;

        let key = parse_rsa_public_key(jwk).map_err(|e| {
            tracing::warn!(target: "jwks.client", kid = %kid, error = %e, "Failed to parse RSA public key");
            e
        })?;
        let key = Arc::new(key);

        if let Some(cache) = &self.cache {
            cache.set(kid.to_string(), Arc::clone(&key)).await;
        }

        tracing::info!(target: "jwks.client", kid = %kid, "Fetched signing key");
        Ok(key)
    }

    /// Get the public key for the `kid` in `token`'s header.
    ///
    /// The token is NOT verified here; verify it with the returned key.
    ///
    /// # Errors
    ///
    /// `JwksError::TokenFormat` (before any network call) if the token is not
    /// a JWT or has no string `kid`; otherwise as [`JwksClient::get_public_key`].
    #[instrument(skip_all)]
    pub async fn get_public_key_from_token(
        &self,
        token: &str,
    ) -> Result<Arc<RsaPublicKey>, JwksError> {
        let kid = extract_kid(token).map_err(|e| {
            observability::record_key_lookup_error(e.kind());
            e
        })?;
        self.get_public_key(&kid).await
    }

    /// Key function for [`crate::verify_token`].
    ///
    /// The returned value holds a reference to this client and can be used
    /// any number of times.
    pub fn key_fn(self: &Arc<Self>) -> KeyFn {
        KeyFn::new(Arc::clone(self))
    }
}
