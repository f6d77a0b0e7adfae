//! Cache configuration for the JWKS client.

use crate::error::JwksError;
use std::time::Duration;

/// Default maximum number of cached keys.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 5;

/// Default cache lifetime (1 hour).
pub const DEFAULT_CACHE_MAX_AGE: Duration = Duration::from_secs(3600);

/// Key cache settings, fixed at client construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Enable or disable caching. When disabled every lookup fetches the key set.
    pub enabled: bool,

    /// Maximum number of cached keys.
    pub max_entries: usize,

    /// How long the cache stays valid after the most recent insert.
    pub max_age: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_age: DEFAULT_CACHE_MAX_AGE,
        }
    }
}

impl CacheConfig {
    /// Configuration with caching turned off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the maximum number of cached keys.
    #[must_use]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the cache lifetime.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Reject settings that would produce a degenerate cache.
    ///
    /// A disabled configuration is always valid.
    ///
    /// # Errors
    ///
    /// Returns `JwksError::InvalidConfig` if caching is enabled with zero
    /// capacity or a zero lifetime.
    pub fn validate(&self) -> Result<(), JwksError> {
        if !self.enabled {
            return Ok(());
        }

        if self.max_entries == 0 {
            return Err(JwksError::InvalidConfig(
                "max_entries must be greater than 0".to_string(),
            ));
        }

        if self.max_age.is_zero() {
            return Err(JwksError::InvalidConfig(
                "max_age must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
