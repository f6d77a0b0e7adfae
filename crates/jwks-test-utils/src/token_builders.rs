//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating test claims and hand-built tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use serde_json::json;

/// Builder for creating test JWT claims
///
/// # Example
/// ```rust,ignore
/// let claims = TestClaimsBuilder::new()
///     .for_user("alice")
///     .issued_by("https://idp.example")
///     .expires_in(3600)
///     .build();
/// let token = keypair.sign(&claims);
/// ```
pub struct TestClaimsBuilder {
    sub: String,
    iss: Option<String>,
    aud: Option<String>,
    exp: i64,
    iat: i64,
}

impl TestClaimsBuilder {
    /// Create a new claims builder with defaults (valid for one hour)
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-subject".to_string(),
            iss: None,
            aud: None,
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set the issuer
    pub fn issued_by(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_string());
        self
    }

    /// Set the audience
    pub fn for_audience(mut self, audience: &str) -> Self {
        self.aud = Some(audience.to_string());
        self
    }

    /// Set expiration in seconds from now (negative for already expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Build the claims as a JSON value
    pub fn build(self) -> serde_json::Value {
        let mut claims = json!({
            "sub": self.sub,
            "exp": self.exp,
            "iat": self.iat,
        });
        if let Some(iss) = self.iss {
            claims["iss"] = json!(iss);
        }
        if let Some(aud) = self.aud {
            claims["aud"] = json!(aud);
        }
        claims
    }
}

impl Default for TestClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble an unsigned token from raw header and claims JSON.
///
/// The signature segment is a fixed placeholder. Useful for exercising
/// header parsing with headers a real signer would never produce.
pub fn unsigned_token(header: &serde_json::Value, claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(header.to_string());
    let claims = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{claims}.c2lnbmF0dXJl")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_builder_defaults() {
        let claims = TestClaimsBuilder::new().build();

        assert_eq!(claims["sub"], "test-subject");
        assert!(claims["exp"].as_i64().unwrap() > Utc::now().timestamp());
        assert!(claims.get("iss").is_none());
        assert!(claims.get("aud").is_none());
    }

    #[test]
    fn test_claims_builder_fluent_api() {
        let claims = TestClaimsBuilder::new()
            .for_user("alice")
            .issued_by("https://idp.example")
            .for_audience("my-api")
            .issued_at(1_700_000_000)
            .build();

        assert_eq!(claims["sub"], "alice");
        assert_eq!(claims["iss"], "https://idp.example");
        assert_eq!(claims["aud"], "my-api");
        assert_eq!(claims["iat"], 1_700_000_000);
    }

    #[test]
    fn test_expires_in_past() {
        let claims = TestClaimsBuilder::new().expires_in(-3600).build();
        assert!(claims["exp"].as_i64().unwrap() < Utc::now().timestamp());
    }

    #[test]
    fn test_unsigned_token_header_round_trips() {
        let token = unsigned_token(&json!({"alg": "RS256", "kid": "k1"}), &json!({}));
        let parts: Vec<&str> = token.split('.').collect();

        assert_eq!(parts.len(), 3);
        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[0]).unwrap()).unwrap();
        assert_eq!(header["kid"], "k1");
    }
}
