//! Bounded, time-expiring key cache.
//!
//! Keys are stored by `kid` under a single lifetime shared by the whole cache:
//! every insert restarts the clock for all entries, and once `max_age` has
//! elapsed since the last insert every entry is treated as absent at once.
//!
//! Capacity is enforced by evicting one arbitrary entry when the cache is
//! full. Callers must not rely on any eviction order.

use crate::config::CacheConfig;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheState<V> {
    /// Map of key ID to cached key.
    keys: HashMap<String, V>,

    /// Time of the most recent insert. `None` until the first insert.
    refreshed_at: Option<Instant>,
}

/// Thread-safe key cache with one shared expiry.
///
/// Readers run concurrently; inserts take the write lock.
pub struct KeyCache<V> {
    state: RwLock<CacheState<V>>,
    max_entries: usize,
    max_age: Duration,
}

impl<V: Clone> KeyCache<V> {
    /// Create an empty cache.
    ///
    /// A `max_entries` of zero is tolerated: each insert evicts first, so
    /// the cache holds at most the latest entry.
    pub fn new(max_entries: usize, max_age: Duration) -> Self {
        Self {
            state: RwLock::new(CacheState {
                keys: HashMap::new(),
                refreshed_at: None,
            }),
            max_entries,
            max_age,
        }
    }

    /// Create an empty cache sized from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.max_age)
    }

    /// Look up a key.
    ///
    /// Returns `None` if the cache lifetime has elapsed, even when the entry
    /// is still stored.
    pub async fn get(&self, kid: &str) -> Option<V> {
        let state = self.state.read().await;

        let fresh = state
            .refreshed_at
            .is_some_and(|refreshed_at| refreshed_at.elapsed() <= self.max_age);
        if !fresh {
            tracing::trace!(target: "jwks.cache", kid = %kid, "Key cache expired or empty");
            return None;
        }

        state.keys.get(kid).cloned()
    }

    /// Insert or overwrite a key and restart the lifetime of the whole cache.
    pub async fn set(&self, kid: String, value: V) {
        let mut state = self.state.write().await;

        if state.keys.len() >= self.max_entries {
            if let Some(evicted) = state.keys.keys().next().cloned() {
                state.keys.remove(&evicted);
                tracing::debug!(
                    target: "jwks.cache",
                    evicted_kid = %evicted,
                    max_entries = self.max_entries,
                    "Key cache full, evicted one entry"
                );
            }
        }

        state.keys.insert(kid, value);
        state.refreshed_at = Some(Instant::now());
    }

    /// Number of stored entries, including ones past the cache lifetime.
    pub async fn len(&self) -> usize {
        self.state.read().await.keys.len()
    }

    /// Whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.keys.is_empty()
    }

    /// Configured capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Configured lifetime.
    pub fn max_age(&self) -> Duration {
        self.max_age
    }
}
