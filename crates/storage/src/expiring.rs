//! Expiring key-value store
//!
//! DashMap-backed string store with per-key TTL, standing in for the
//! ephemeral store that holds session handles and validation codes.
//!
//! # Design
//!
//! - DashMap: sharded, each `set`/`delete` only locks the key's shard
//! - Lazy expiry: reads treat an elapsed entry as absent and evict it
//! - Partitions: handles sharing one map under disjoint key prefixes, so the
//!   token and code namespaces never collide
//!
//! # Example
//!
//! ```ignore
//! let store = ExpiringStore::new();
//! let tokens = store.partition("tokens");
//! let codes = store.partition("codes");
//!
//! tokens.set("abc", "u1", Some(Duration::from_secs(60)))?;
//! assert!(codes.get("abc")?.is_none());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use mappin_core::traits::EphemeralStore;
use mappin_core::MappinResult;

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    #[inline]
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Expiring key-value store
///
/// # Thread Safety
///
/// Clone is cheap (Arc clone); clones and partitions share the same entries.
#[derive(Clone)]
pub struct ExpiringStore {
    entries: Arc<DashMap<String, Entry>>,
    prefix: Arc<str>,
}

impl ExpiringStore {
    /// Create a new empty store with no key prefix.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            prefix: Arc::from(""),
        }
    }

    /// A handle over the same entries whose keys live under `{name}:`.
    ///
    /// Partitions of the same store never see each other's keys.
    pub fn partition(&self, name: &str) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            prefix: Arc::from(format!("{}{}:", self.prefix, name)),
        }
    }

    /// The key prefix of this handle.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[inline]
    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Number of live entries visible through this handle.
    pub fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|e| e.key().starts_with(&*self.prefix) && e.value().is_live(now))
            .count()
    }

    /// Remaining lifetime of a live key (None if absent or without TTL).
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(&self.full_key(key))
            .filter(|e| e.is_live(now))
            .and_then(|e| e.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Evict every elapsed entry across all partitions.
    ///
    /// Returns the number of entries evicted.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        before.saturating_sub(self.entries.len())
    }
}

impl Default for ExpiringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExpiringStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("prefix", &self.prefix)
            .field("live_entries", &self.live_entries())
            .finish()
    }
}

impl EphemeralStore for ExpiringStore {
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> MappinResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: ttl.map(|t| Instant::now() + t),
        };
        self.entries.insert(self.full_key(key), entry);
        Ok(())
    }

    fn get(&self, key: &str) -> MappinResult<Option<String>> {
        let full = self.full_key(key);
        let now = Instant::now();
        let found = self.entries.get(&full).map(|e| {
            if e.is_live(now) {
                Some(e.value.clone())
            } else {
                None
            }
        });
        match found {
            Some(Some(value)) => Ok(Some(value)),
            Some(None) => {
                self.entries.remove_if(&full, |_, e| !e.is_live(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn delete(&self, keys: &[&str]) -> MappinResult<u64> {
        let now = Instant::now();
        let mut removed = 0;
        for key in keys {
            if let Some((_, entry)) = self.entries.remove(&self.full_key(key)) {
                if entry.is_live(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}
