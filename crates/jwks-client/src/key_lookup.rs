//! Key lookup callback and token verification.
//!
//! `jsonwebtoken` verifies a token against a `DecodingKey` it is handed. The
//! [`KeyLookup`] trait is the seam that picks that key from the token's
//! header, and [`verify_token`] is the routine that drives it: read the
//! header, look up the key, verify signature and claims.

use crate::client::JwksClient;
use crate::error::JwksError;
use crate::rsa_key::decoding_key;
use async_trait::async_trait;
use jsonwebtoken::{DecodingKey, Header, TokenData, Validation};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::instrument;

/// Resolves the verification key for a token from its (unverified) header.
#[async_trait]
pub trait KeyLookup: Send + Sync {
    /// Return the key to verify a token carrying `header` with.
    async fn lookup(&self, header: &Header) -> Result<DecodingKey, JwksError>;
}

/// Key function backed by a [`JwksClient`].
///
/// Each call may fetch the key set and populate the client's cache.
#[derive(Debug, Clone)]
pub struct KeyFn {
    client: Arc<JwksClient>,
}

impl KeyFn {
    /// Wrap a shared client.
    pub fn new(client: Arc<JwksClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KeyLookup for KeyFn {
    async fn lookup(&self, header: &Header) -> Result<DecodingKey, JwksError> {
        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| JwksError::TokenFormat("missing kid in token header".to_string()))?;

        let key = self.client.get_public_key(kid).await?;
        Ok(decoding_key(&key))
    }
}

/// Verify `token` with the key `key_lookup` resolves for it.
///
/// Signature, `exp` and the other checks enabled in `validation` are
/// performed by `jsonwebtoken`.
///
/// # Errors
///
/// - `JwksError::TokenFormat` if the header cannot be parsed
/// - any error from the key lookup
/// - `JwksError::Verification` if the signature or claims are rejected
#[instrument(skip_all)]
pub async fn verify_token<C: DeserializeOwned>(
    token: &str,
    key_lookup: &dyn KeyLookup,
    validation: &Validation,
) -> Result<TokenData<C>, JwksError> {
    let header = jsonwebtoken::decode_header(token).map_err(|e| {
        tracing::debug!(target: "jwks.token", error = %e, "Failed to parse JWT header");
        JwksError::TokenFormat(format!("failed to parse token header: {e}"))
    })?;

    let key = key_lookup.lookup(&header).await?;

    jsonwebtoken::decode::<C>(token, &key, validation).map_err(|e| {
        tracing::debug!(target: "jwks.token", error = %e, "Token verification failed");
        JwksError::Verification(e.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::rsa_key::rsa_public_key_from_components;
    use jsonwebtoken::Algorithm;
    use jwks_test_utils::{test_keypair, TestClaimsBuilder};
    use serde_json::Value;

    /// Always returns the same key, regardless of header.
    struct StaticKey(DecodingKey);

    #[async_trait]
    impl KeyLookup for StaticKey {
        async fn lookup(&self, _header: &Header) -> Result<DecodingKey, JwksError> {
            Ok(self.0.clone())
        }
    }

    fn static_key(seed: u8) -> StaticKey {
        let keypair = test_keypair(seed).unwrap();
        let key = rsa_public_key_from_components(keypair.n(), keypair.e()).unwrap();
        StaticKey(decoding_key(&key))
    }

    #[tokio::test]
    async fn test_verify_token_with_matching_key() {
        let keypair = test_keypair(1).unwrap();
        let token = keypair.sign(&TestClaimsBuilder::new().for_user("alice").build());

        let data = verify_token::<Value>(&token, &static_key(1), &Validation::new(Algorithm::RS256))
            .await
            .unwrap();

        assert_eq!(data.claims["sub"], "alice");
        assert_eq!(data.header.kid.as_deref(), Some(keypair.kid()));
    }

    #[tokio::test]
    async fn test_verify_token_with_wrong_key() {
        let keypair = test_keypair(1).unwrap();
        let token = keypair.sign(&TestClaimsBuilder::new().build());

        let result =
            verify_token::<Value>(&token, &static_key(2), &Validation::new(Algorithm::RS256)).await;

        assert!(
            matches!(&result, Err(JwksError::Verification(_))),
            "Expected Verification error, got {:?}",
            result.map(|d| d.claims)
        );
    }

    #[tokio::test]
    async fn test_verify_token_expired() {
        let keypair = test_keypair(1).unwrap();
        let token = keypair.sign(&TestClaimsBuilder::new().expires_in(-3600).build());

        let result =
            verify_token::<Value>(&token, &static_key(1), &Validation::new(Algorithm::RS256)).await;

        assert!(matches!(result, Err(JwksError::Verification(_))));
    }

    #[tokio::test]
    async fn test_verify_token_malformed() {
        let result =
            verify_token::<Value>("not-a-token", &static_key(1), &Validation::new(Algorithm::RS256))
                .await;

        assert!(matches!(result, Err(JwksError::TokenFormat(_))));
    }

    #[tokio::test]
    async fn test_verify_token_with_large_claims() {
        let keypair = test_keypair(1).unwrap();
        let mut claims = TestClaimsBuilder::new().build();
        claims["groups"] = Value::from(vec!["group-name"; 1_000]);
        let token = keypair.sign(&claims);
        assert!(token.len() > 12_000);

        let data = verify_token::<Value>(&token, &static_key(1), &Validation::new(Algorithm::RS256))
            .await
            .unwrap();

        assert_eq!(data.claims["groups"].as_array().map(Vec::len), Some(1_000));
    }
}
