//! In-memory document store
//!
//! Holds every collection the service persists: accounts, messages,
//! evaluations, relationships and connection requests.
//!
//! # Design
//!
//! - One `RwLock` over all collections. Each trait method takes the lock
//!   once, so a method that touches several collections (promoting a request
//!   into a relationship, writing an evaluation together with its counter)
//!   is a single atomic step, the in-memory equivalent of a multi-document
//!   transaction.
//! - Lock acquisition is bounded by the configured store timeout; a caller
//!   that cannot get the lock in time receives `MappinError::Timeout`.
//! - Relationships are keyed by the unordered pair, requests by the ordered
//!   pair, evaluations by (uid, item). Uniqueness falls out of the keys.

mod accounts;
mod connections;
mod evaluations;
mod messages;

use std::time::Duration;

use mappin_core::types::{AccountRecord, ItemId, MessageRecord, Polarity, Uid};
use mappin_core::{MappinError, MappinResult, StoreConfig};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

/// Unordered pair key: the smaller uid always comes first.
pub(crate) fn pair_key(a: &Uid, b: &Uid) -> (Uid, Uid) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// All collections, guarded together.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) accounts: FxHashMap<Uid, AccountRecord>,
    /// Unique secondary index: email -> uid
    pub(crate) emails: FxHashMap<String, Uid>,
    pub(crate) messages: FxHashMap<ItemId, MessageRecord>,
    pub(crate) evaluations: FxHashMap<(Uid, ItemId), Polarity>,
    pub(crate) relationships: FxHashSet<(Uid, Uid)>,
    /// (sender, receiver)
    pub(crate) requests: FxHashSet<(Uid, Uid)>,
}

/// In-memory document store
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct DocumentStore {
    tables: RwLock<Tables>,
    op_timeout: Duration,
}

impl DocumentStore {
    /// Create an empty store with the default timeout.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create an empty store bounded by `config.op_timeout()`.
    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            op_timeout: config.op_timeout(),
        }
    }

    /// The bound applied to every lock acquisition.
    pub fn op_timeout(&self) -> Duration {
        self.op_timeout
    }

    /// Run `f` with shared access to the collections.
    pub(crate) fn read<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Tables) -> MappinResult<R>,
    ) -> MappinResult<R> {
        let guard = self
            .tables
            .try_read_for(self.op_timeout)
            .ok_or_else(|| self.timed_out(operation))?;
        f(&guard)
    }

    /// Run `f` with exclusive access to the collections.
    pub(crate) fn write<R>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut Tables) -> MappinResult<R>,
    ) -> MappinResult<R> {
        let mut guard = self
            .tables
            .try_write_for(self.op_timeout)
            .ok_or_else(|| self.timed_out(operation))?;
        f(&mut guard)
    }

    fn timed_out(&self, operation: &'static str) -> MappinError {
        tracing::warn!(
            operation,
            timeout_ms = self.op_timeout.as_millis() as u64,
            "document store lock not acquired in time"
        );
        MappinError::timeout(operation, self.op_timeout.as_millis() as u64)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("DocumentStore");
        s.field("op_timeout", &self.op_timeout);
        if let Some(t) = self.tables.try_read() {
            s.field("accounts", &t.accounts.len())
                .field("messages", &t.messages.len())
                .field("evaluations", &t.evaluations.len())
                .field("relationships", &t.relationships.len())
                .field("requests", &t.requests.len());
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mappin_core::traits::ConnectionStore;
    use mappin_core::ErrorKind;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_pair_key_is_orientation_free() {
        let a = Uid::from("u-a");
        let b = Uid::from("u-b");
        assert_eq!(pair_key(&a, &b), pair_key(&b, &a));
    }

    #[test]
    fn test_contended_lock_times_out() {
        let store = Arc::new(DocumentStore::with_config(&StoreConfig { op_timeout_ms: 20 }));
        let held = store.tables.write();

        let contender = Arc::clone(&store);
        let err = thread::spawn(move || {
            contender
                .relationship_exists(&Uid::from("a"), &Uid::from("b"))
                .unwrap_err()
        })
        .join()
        .unwrap();
        drop(held);

        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(matches!(err, MappinError::Timeout { operation: "relationship_exists", .. }));
    }

    #[test]
    fn test_debug_impl() {
        let store = DocumentStore::new();
        let debug_str = format!("{:?}", store);
        assert!(debug_str.contains("DocumentStore"));
        assert!(debug_str.contains("relationships"));
    }
}
