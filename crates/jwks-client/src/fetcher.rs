//! OIDC discovery and JWKS retrieval.
//!
//! Both operations issue one unauthenticated GET with no retry. Responses are
//! decoded in full or dropped before returning, so connections go back to the
//! pool or are closed.

use crate::error::JwksError;
use crate::observability;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::instrument;

/// Path of the OpenID Provider configuration document, relative to the issuer.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// JSON Web Key from a JWKS document.
///
/// Members are kept as raw JSON so that one malformed entry does not fail
/// the whole document. Type checks happen only for the entry a lookup
/// selects: a non-string `kid` never matches, and a non-string `n` or `e`
/// is reported by the converter. Everything else lands in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Jwk {
    /// Key ID - used to select the correct key for verification.
    #[serde(default)]
    pub kid: Option<Value>,

    /// Key type ("RSA" for keys this client can convert).
    #[serde(default)]
    pub kty: Option<Value>,

    /// Algorithm (e.g. "RS256").
    #[serde(default)]
    pub alg: Option<Value>,

    /// Key use ("sig" for signing keys).
    #[serde(default, rename = "use")]
    pub key_use: Option<Value>,

    /// RSA modulus (base64url, big-endian).
    #[serde(default)]
    pub n: Option<Value>,

    /// RSA public exponent (base64url, big-endian).
    #[serde(default)]
    pub e: Option<Value>,

    /// Members this client ignores (`x5c`, `x5t`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Jwk {
    /// Key ID, if present and a string.
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_ref().and_then(Value::as_str)
    }

    /// Key type, if present and a string.
    pub fn kty(&self) -> Option<&str> {
        self.kty.as_ref().and_then(Value::as_str)
    }

    /// Algorithm, if present and a string.
    pub fn alg(&self) -> Option<&str> {
        self.alg.as_ref().and_then(Value::as_str)
    }
}

/// JSON Web Key Set document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JwkSet {
    /// Keys in document order.
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// First key whose `kid` is the string `kid`.
    ///
    /// Entries without a string `kid` are skipped.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid() == Some(kid))
    }
}

/// The part of the OpenID Provider configuration this client reads.
#[derive(Debug, Deserialize)]
struct OpenIdConfiguration {
    #[serde(default)]
    jwks_uri: Option<String>,
}

/// URL of the discovery document for `issuer`.
pub fn discovery_url(issuer: &str) -> String {
    let issuer = issuer.strip_suffix('/').unwrap_or(issuer);
    format!("{issuer}{DISCOVERY_PATH}")
}

/// HTTP fetcher for discovery and key set documents.
#[derive(Debug, Clone)]
pub struct JwksFetcher {
    http_client: reqwest::Client,
}

/// `User-Agent` sent by the default HTTP client.
pub const USER_AGENT: &str = concat!("jwks-client/", env!("CARGO_PKG_VERSION"));

impl JwksFetcher {
    /// Create a fetcher with a default HTTP client (no request timeout).
    ///
    /// # Errors
    ///
    /// Returns `JwksError::Discovery` if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialize).
    pub fn new() -> Result<Self, JwksError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!(target: "jwks.fetcher", error = %e, "Failed to build HTTP client");
                JwksError::Discovery(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self::with_http_client(http_client))
    }

    /// Create a fetcher on a caller-supplied HTTP client.
    ///
    /// Timeouts, proxies and TLS settings come from the client.
    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Resolve the JWKS URI advertised by `issuer`.
    ///
    /// # Errors
    ///
    /// Returns `JwksError::Discovery` if the request fails, the status is not
    /// 200, the body is not JSON, or `jwks_uri` is absent or empty.
    #[instrument(skip(self))]
    pub async fn resolve_jwks_uri(&self, issuer: &str) -> Result<String, JwksError> {
        let start = Instant::now();
        let result = self.request_jwks_uri(issuer).await;
        observability::record_fetch("discovery", result.is_ok(), start.elapsed());
        result
    }

    async fn request_jwks_uri(&self, issuer: &str) -> Result<String, JwksError> {
        let url = discovery_url(issuer);
        tracing::debug!(target: "jwks.fetcher", url = %url, "Fetching OpenID configuration");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(target: "jwks.fetcher", error = %e, "Failed to fetch OpenID configuration");
            JwksError::Discovery(format!("failed to fetch OpenID configuration: {e}"))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                target: "jwks.fetcher",
                status = %status,
                "Discovery endpoint returned error"
            );
            return Err(JwksError::Discovery(format!(
                "unexpected response code: {}",
                status.as_u16()
            )));
        }

        let config: OpenIdConfiguration = response.json().await.map_err(|e| {
            tracing::error!(target: "jwks.fetcher", error = %e, "Failed to parse OpenID configuration");
            JwksError::Discovery(format!("failed to decode OpenID configuration: {e}"))
        })?;

        match config.jwks_uri {
            Some(jwks_uri) if !jwks_uri.is_empty() => {
                tracing::info!(target: "jwks.fetcher", jwks_uri = %jwks_uri, "Resolved JWKS URI");
                Ok(jwks_uri)
            }
            _ => {
                tracing::error!(target: "jwks.fetcher", "OpenID configuration has no jwks_uri");
                Err(JwksError::Discovery(
                    "jwks_uri not found in OpenID configuration".to_string(),
                ))
            }
        }
    }

    /// Fetch the key set published at `jwks_uri`.
    ///
    /// # Errors
    ///
    /// Returns `JwksError::Fetch` if the request fails, the status is not 200,
    /// or the body does not decode as a key set.
    #[instrument(skip(self))]
    pub async fn fetch_key_set(&self, jwks_uri: &str) -> Result<JwkSet, JwksError> {
        let start = Instant::now();
        let result = self.request_key_set(jwks_uri).await;
        observability::record_fetch("key_set", result.is_ok(), start.elapsed());
        result
    }

    async fn request_key_set(&self, jwks_uri: &str) -> Result<JwkSet, JwksError> {
        tracing::debug!(target: "jwks.fetcher", url = %jwks_uri, "Fetching JWKS");

        let response = self.http_client.get(jwks_uri).send().await.map_err(|e| {
            tracing::error!(target: "jwks.fetcher", error = %e, "Failed to fetch JWKS");
            JwksError::Fetch(format!("failed to fetch JWKS: {e}"))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(
                target: "jwks.fetcher",
                status = %status,
                "JWKS endpoint returned error"
            );
            return Err(JwksError::Fetch(format!(
                "unexpected response code: {}",
                status.as_u16()
            )));
        }

        let key_set: JwkSet = response.json().await.map_err(|e| {
            tracing::error!(target: "jwks.fetcher", error = %e, "Failed to parse JWKS response");
            JwksError::Fetch(format!("failed to decode JWKS: {e}"))
        })?;

        tracing::debug!(
            target: "jwks.fetcher",
            key_count = key_set.keys.len(),
            "JWKS fetched"
        );

        Ok(key_set)
    }
}
