//! Conversion of JWK entries into RSA public keys.
//!
//! JWKs carry the modulus (`n`) and public exponent (`e`) as unpadded
//! base64url big-endian integers (RFC 7518 section 6.3.1).

use crate::error::JwksError;
use crate::fetcher::Jwk;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::DecodingKey;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use serde_json::Value;

/// Convert a JWK entry into an RSA public key.
///
/// The decoded integers are taken as they are. Size and exponent policy is
/// left to whatever verifies signatures with the key.
///
/// # Errors
///
/// Returns `JwksError::KeyFormat` if `n` or `e` is missing, is not a string,
/// or is not valid unpadded base64url.
pub fn parse_rsa_public_key(jwk: &Jwk) -> Result<RsaPublicKey, JwksError> {
    let n = string_member(jwk.n.as_ref(), "n")?;
    let e = string_member(jwk.e.as_ref(), "e")?;

    rsa_public_key_from_components(n, e)
}

fn string_member<'a>(value: Option<&'a Value>, name: &str) -> Result<&'a str, JwksError> {
    match value {
        Some(Value::String(s)) => Ok(s),
        None => Err(JwksError::KeyFormat(format!(
            "invalid JWKS key: missing '{name}'"
        ))),
        Some(other) => Err(JwksError::KeyFormat(format!(
            "invalid JWKS key: '{name}' must be a string, got {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Build an RSA public key from base64url-encoded modulus and exponent.
///
/// Both values are big-endian unsigned integers of any length.
///
/// # Errors
///
/// Returns `JwksError::KeyFormat` if either value is not unpadded base64url.
pub fn rsa_public_key_from_components(n: &str, e: &str) -> Result<RsaPublicKey, JwksError> {
    let n_bytes = URL_SAFE_NO_PAD
        .decode(n)
        .map_err(|err| JwksError::KeyFormat(format!("failed to decode modulus (n): {err}")))?;
    let e_bytes = URL_SAFE_NO_PAD
        .decode(e)
        .map_err(|err| JwksError::KeyFormat(format!("failed to decode exponent (e): {err}")))?;

    Ok(RsaPublicKey::new_unchecked(
        BigUint::from_bytes_be(&n_bytes),
        BigUint::from_bytes_be(&e_bytes),
    ))
}

/// Turn a converted key into the form `jsonwebtoken` verifies with.
pub fn decoding_key(key: &RsaPublicKey) -> DecodingKey {
    DecodingKey::from_rsa_raw_components(&key.n().to_bytes_be(), &key.e().to_bytes_be())
}
