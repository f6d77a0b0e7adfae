//! Unverified JWT header inspection.
//!
//! The key ID is read from the token header before the signature can be
//! checked, because the `kid` selects the key to check it with.
//!
//! # Security
//!
//! Nothing read here is trusted: the token MUST still be verified with the
//! key the `kid` resolves to. Only the header segment is decoded, whatever
//! the size of the payload.

use crate::error::JwksError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Extract the `kid` (key ID) from a JWT header without verifying the signature.
///
/// Any string is accepted as a `kid`, including the empty string.
///
/// # Errors
///
/// Returns `JwksError::TokenFormat` if:
/// - it is not three dot-separated segments
/// - the header is not base64url-encoded JSON
/// - the header has no `kid`, or `kid` is not a string
pub fn extract_kid(token: &str) -> Result<String, JwksError> {
    // JWT format: header.payload.signature
    let mut parts = token.split('.');
    let (Some(header_part), Some(_), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(target: "jwks.token", "Token rejected: invalid JWT format");
        return Err(JwksError::TokenFormat(
            "token is not a JWT (expected header.payload.signature)".to_string(),
        ));
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "jwks.token", error = %e, "Failed to decode JWT header base64");
        JwksError::TokenFormat(format!("failed to decode token header: {e}"))
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "jwks.token", error = %e, "Failed to parse JWT header JSON");
        JwksError::TokenFormat(format!("failed to parse token header: {e}"))
    })?;

    header
        .get("kid")
        .and_then(|v| v.as_str())
        .map(ToString::to_string)
        .ok_or_else(|| JwksError::TokenFormat("missing kid in token header".to_string()))
}
