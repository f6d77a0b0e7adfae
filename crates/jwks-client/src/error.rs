//! JWKS client error types.
//!
//! Every failure is returned to the immediate caller; nothing is retried or
//! swallowed internally. Each variant corresponds to one failure class so
//! callers can decide whether a retry makes sense (`Fetch`) or not
//! (`KeyNotFound`, `TokenFormat`).

use thiserror::Error;

/// JWKS client error type.
///
/// - Discovery: construction cannot proceed
/// - Fetch: key set could not be retrieved, caller may retry
/// - KeyNotFound: the key set has no entry for the requested `kid`
/// - KeyFormat: the matching entry carries unusable key material
/// - TokenFormat: the presented token is not a JWT or has no `kid`
/// - InvalidConfig: cache configuration rejected at construction
/// - Verification: signature or claims check failed in `verify_token`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwksError {
    #[error("OIDC discovery failed: {0}")]
    Discovery(String),

    #[error("JWKS fetch failed: {0}")]
    Fetch(String),

    #[error("Key not found in JWKS: {0}")]
    KeyNotFound(String),

    #[error("Invalid RSA key: {0}")]
    KeyFormat(String),

    #[error("Invalid token: {0}")]
    TokenFormat(String),

    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    #[error("Token verification failed: {0}")]
    Verification(String),
}

impl JwksError {
    /// Bounded label for this error, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            JwksError::Discovery(_) => "discovery",
            JwksError::Fetch(_) => "fetch",
            JwksError::KeyNotFound(_) => "key_not_found",
            JwksError::KeyFormat(_) => "key_format",
            JwksError::TokenFormat(_) => "token_format",
            JwksError::InvalidConfig(_) => "invalid_config",
            JwksError::Verification(_) => "verification",
        }
    }
}
