//! Example binary configuration.
//!
//! Configuration is loaded from environment variables.

use jwks_client::CacheConfig;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Example binary configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Issuer URL to run discovery against.
    pub issuer: String,

    /// Key cache settings.
    pub cache: CacheConfig,

    /// Per-request HTTP timeout. No timeout when unset.
    pub http_timeout: Option<Duration>,

    /// Expected `aud` claim. Audience is not checked when unset.
    pub audience: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid cache configuration: {0}")]
    InvalidCache(String),

    #[error("Invalid HTTP timeout configuration: {0}")]
    InvalidHttpTimeout(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let issuer = vars
            .get("JWKS_ISSUER")
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("JWKS_ISSUER".to_string()))?
            .clone();

        let enabled = match vars.get("JWKS_CACHE_ENABLED") {
            Some(value_str) => value_str.parse::<bool>().map_err(|e| {
                ConfigError::InvalidCache(format!(
                    "JWKS_CACHE_ENABLED must be 'true' or 'false', got '{}': {}",
                    value_str, e
                ))
            })?,
            None => true,
        };

        let mut cache = if enabled {
            CacheConfig::default()
        } else {
            CacheConfig::disabled()
        };

        if let Some(value_str) = vars.get("JWKS_CACHE_MAX_ENTRIES") {
            let value: usize = value_str.parse().map_err(|e| {
                ConfigError::InvalidCache(format!(
                    "JWKS_CACHE_MAX_ENTRIES must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidCache(
                    "JWKS_CACHE_MAX_ENTRIES must be greater than 0".to_string(),
                ));
            }

            cache = cache.with_max_entries(value);
        }

        if let Some(value_str) = vars.get("JWKS_CACHE_MAX_AGE_SECONDS") {
            cache = cache.with_max_age(parse_positive_seconds(
                "JWKS_CACHE_MAX_AGE_SECONDS",
                value_str,
            )
            .map_err(ConfigError::InvalidCache)?);
        }

        let http_timeout = vars
            .get("JWKS_HTTP_TIMEOUT_SECONDS")
            .map(|value_str| parse_positive_seconds("JWKS_HTTP_TIMEOUT_SECONDS", value_str))
            .transpose()
            .map_err(ConfigError::InvalidHttpTimeout)?;

        let audience = vars
            .get("JWKS_AUDIENCE")
            .filter(|value| !value.is_empty())
            .cloned();

        Ok(Config {
            issuer,
            cache,
            http_timeout,
            audience,
        })
    }
}

fn parse_positive_seconds(name: &str, value_str: &str) -> Result<Duration, String> {
    let value: u64 = value_str.parse().map_err(|e| {
        format!(
            "{} must be a valid positive integer, got '{}': {}",
            name, value_str, e
        )
    })?;

    if value == 0 {
        return Err(format!("{} must be greater than 0", name));
    }

    Ok(Duration::from_secs(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "JWKS_ISSUER".to_string(),
            "https://idp.example".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_success() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.issuer, "https://idp.example");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_entries, 5);
        assert_eq!(config.cache.max_age, Duration::from_secs(3600));
        assert!(config.http_timeout.is_none());
        assert!(config.audience.is_none());
    }

    #[test]
    fn test_from_vars_missing_issuer() {
        let result = Config::from_vars(&HashMap::new());
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(var)) if var == "JWKS_ISSUER"));
    }

    #[test]
    fn test_from_vars_empty_issuer() {
        let vars = HashMap::from([("JWKS_ISSUER".to_string(), String::new())]);
        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_from_vars_custom_values() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_MAX_ENTRIES".to_string(), "20".to_string());
        vars.insert("JWKS_CACHE_MAX_AGE_SECONDS".to_string(), "300".to_string());
        vars.insert("JWKS_HTTP_TIMEOUT_SECONDS".to_string(), "5".to_string());
        vars.insert("JWKS_AUDIENCE".to_string(), "my-api".to_string());

        let config = Config::from_vars(&vars).unwrap();

        assert_eq!(config.cache.max_entries, 20);
        assert_eq!(config.cache.max_age, Duration::from_secs(300));
        assert_eq!(config.http_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.audience.as_deref(), Some("my-api"));
    }

    #[test]
    fn test_cache_disabled() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_ENABLED".to_string(), "false".to_string());

        let config = Config::from_vars(&vars).unwrap();

        assert!(!config.cache.enabled);
        assert!(config.cache.validate().is_ok());
    }

    #[test]
    fn test_cache_enabled_invalid() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_ENABLED".to_string(), "yes".to_string());

        match Config::from_vars(&vars) {
            Err(ConfigError::InvalidCache(msg)) => {
                assert!(msg.contains("JWKS_CACHE_ENABLED"));
            }
            other => panic!("Expected InvalidCache error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_entries_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_MAX_ENTRIES".to_string(), "0".to_string());

        match Config::from_vars(&vars) {
            Err(ConfigError::InvalidCache(msg)) => {
                assert!(msg.contains("greater than 0"));
            }
            other => panic!("Expected InvalidCache error, got {:?}", other),
        }
    }

    #[test]
    fn test_max_entries_rejects_non_numeric() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_MAX_ENTRIES".to_string(), "many".to_string());

        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidCache(msg)) if msg.contains("JWKS_CACHE_MAX_ENTRIES")
        ));
    }

    #[test]
    fn test_max_age_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_MAX_AGE_SECONDS".to_string(), "0".to_string());

        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidCache(msg)) if msg.contains("JWKS_CACHE_MAX_AGE_SECONDS")
        ));
    }

    #[test]
    fn test_max_age_rejects_negative() {
        let mut vars = base_vars();
        vars.insert("JWKS_CACHE_MAX_AGE_SECONDS".to_string(), "-60".to_string());

        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidCache(_))
        ));
    }

    #[test]
    fn test_http_timeout_rejects_zero() {
        let mut vars = base_vars();
        vars.insert("JWKS_HTTP_TIMEOUT_SECONDS".to_string(), "0".to_string());

        assert!(matches!(
            Config::from_vars(&vars),
            Err(ConfigError::InvalidHttpTimeout(msg)) if msg.contains("greater than 0")
        ));
    }

    #[test]
    fn test_empty_audience_is_unset() {
        let mut vars = base_vars();
        vars.insert("JWKS_AUDIENCE".to_string(), String::new());

        assert!(Config::from_vars(&vars).unwrap().audience.is_none());
    }
}
