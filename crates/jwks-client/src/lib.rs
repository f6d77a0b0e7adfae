//! JWKS client for verifying JWTs issued by an OpenID Connect provider.
//!
//! The client resolves the provider's JWKS endpoint through OIDC discovery,
//! fetches signing keys on demand, converts them into RSA public keys and
//! caches them by key ID so that token verification does not hit the network
//! on every request.
//!
//! # Architecture
//!
//! ```text
//! client.rs -> cache.rs
//!           -> fetcher.rs -> rsa_key.rs
//! key_lookup.rs -> client.rs (callback for jsonwebtoken verification)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use jwks_client::{verify_token, CacheConfig, JwksClient};
//! use jsonwebtoken::{Algorithm, Validation};
//! use std::sync::Arc;
//!
//! let client = Arc::new(JwksClient::new("https://idp.example", CacheConfig::default()).await?);
//!
//! // Manual lookup from a token's header
//! let key = client.get_public_key_from_token(&token).await?;
//!
//! // Or plug the key function into verification
//! let data = verify_token::<serde_json::Value>(&token, &client.key_fn(), &Validation::new(Algorithm::RS256)).await?;
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod key_lookup;
pub mod observability;
pub mod rsa_key;
pub mod token;

pub use cache::KeyCache;
pub use client::JwksClient;
pub use config::CacheConfig;
pub use error::JwksError;
pub use fetcher::{Jwk, JwkSet, JwksFetcher, USER_AGENT};
pub use key_lookup::{verify_token, KeyFn, KeyLookup};
pub use rsa_key::{decoding_key, parse_rsa_public_key};
pub use token::extract_kid;

/// Re-exported so callers can inspect key material without depending on `rsa` directly.
pub use rsa::RsaPublicKey;
