//! JWKS client example
//!
//! Resolves the configured issuer's signing keys and verifies one token.
//!
//! The token is taken from the first command-line argument, or from
//! `JWKS_TOKEN` when no argument is given. Without a token the binary only
//! performs discovery and reports the JWKS URI.

mod config;

use anyhow::Context;
use config::Config;
use jsonwebtoken::{Algorithm, Validation};
use jwks_client::{verify_token, JwksClient, USER_AGENT};
use rsa::traits::PublicKeyParts;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwks_client=debug,jwks_example=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        issuer = %config.issuer,
        cache_enabled = config.cache.enabled,
        cache_max_entries = config.cache.max_entries,
        cache_max_age_seconds = config.cache.max_age.as_secs(),
        "Configuration loaded successfully"
    );

    let mut http_client = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.http_timeout {
        http_client = http_client.timeout(timeout);
    }
    let http_client = http_client
        .build()
        .context("Failed to build HTTP client")?;

    let client = Arc::new(
        JwksClient::with_http_client(config.issuer.clone(), config.cache, http_client)
            .await
            .context("Failed to create JWKS client")?,
    );

    info!(jwks_uri = %client.jwks_uri(), "Discovery complete");

    let Some(token) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("JWKS_TOKEN").ok())
    else {
        info!("No token supplied; pass one as the first argument or set JWKS_TOKEN");
        return Ok(());
    };

    // Manual key retrieval from the token's header
    let public_key = client
        .get_public_key_from_token(&token)
        .await
        .context("Error retrieving public key")?;

    info!(
        modulus_bits = public_key.n().bits(),
        exponent = %public_key.e(),
        "Retrieved public key"
    );

    // Verification through the key function
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[config.issuer.as_str()]);
    match &config.audience {
        Some(audience) => validation.set_audience(&[audience.as_str()]),
        None => validation.validate_aud = false,
    }

    let data = verify_token::<serde_json::Value>(&token, &client.key_fn(), &validation)
        .await
        .context("Error verifying token")?;

    let claims =
        serde_json::to_string_pretty(&data.claims).context("Failed to serialize claims")?;
    println!("Decoded claims:\n{claims}");

    info!(
        cached_keys = client.cached_key_count().await,
        "Token verified"
    );

    Ok(())
}
