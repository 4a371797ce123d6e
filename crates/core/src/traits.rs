//! Store and collaborator contracts.
//!
//! Components receive implementations of these traits at construction time.
//! Every method is a single store round-trip: it either completes, fails with
//! a [`MappinError`](crate::MappinError) of kind `Store`, or (for lookups)
//! reports absence as `Ok(None)`.
//!
//! Methods documented as *atomic* must be applied by the backend as one
//! indivisible step; the components rely on that to keep their invariants
//! without a read-then-write window.

use std::time::Duration;

use crate::error::MappinResult;
use crate::types::{AccountRecord, ItemId, Location, MessageRecord, NearQuery, Polarity, Uid};

// =============================================================================
// Ephemeral key-value store
// =============================================================================

/// Key-value store with per-key TTL.
pub trait EphemeralStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value.
    ///
    /// `ttl = None` stores the key without expiry.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> MappinResult<()>;

    /// Read a live key.
    fn get(&self, key: &str) -> MappinResult<Option<String>>;

    /// Delete keys, returning how many live keys were actually removed.
    fn delete(&self, keys: &[&str]) -> MappinResult<u64>;
}

// =============================================================================
// Connection store
// =============================================================================

/// Result of [`ConnectionStore::open_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new pending request sender→receiver was stored.
    Created,
    /// The same request was already pending; nothing changed.
    AlreadyPending,
    /// The pair is already connected; nothing changed.
    AlreadyConnected,
    /// A request receiver→sender is pending; nothing changed.
    Reciprocal,
}

/// Relationship and connection-request collections.
pub trait ConnectionStore: Send + Sync {
    /// Atomic conditional insert of a request sender→receiver.
    ///
    /// Checked in this order: existing relationship, pending request in the
    /// opposite direction, duplicate request. Only when none applies is the
    /// request stored.
    fn open_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<OpenOutcome>;

    /// Atomically replace the request sender→receiver with a relationship.
    ///
    /// Any request in the opposite direction is removed in the same step.
    /// Returns `false` (and changes nothing) when no such request exists.
    fn promote_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<bool>;

    /// Delete the request sender→receiver; returns the number removed.
    fn delete_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<u64>;

    /// Delete the relationship between `a` and `b` in either orientation.
    fn delete_relationship(&self, a: &Uid, b: &Uid) -> MappinResult<u64>;

    /// Whether `a` and `b` are connected.
    fn relationship_exists(&self, a: &Uid, b: &Uid) -> MappinResult<bool>;

    /// Whether a request sender→receiver is pending.
    fn request_exists(&self, sender: &Uid, receiver: &Uid) -> MappinResult<bool>;

    /// Everyone connected to `uid`.
    fn relationships_of(&self, uid: &Uid) -> MappinResult<Vec<Uid>>;

    /// Senders of all requests pending for `uid`.
    fn requests_to(&self, uid: &Uid) -> MappinResult<Vec<Uid>>;
}

// =============================================================================
// Evaluation store
// =============================================================================

/// Result of [`EvaluationStore::compare_and_set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// The write happened; `counter` is the item's counter afterwards.
    Applied {
        /// Counter value after the delta was applied
        counter: i64,
    },
    /// The stored evaluation no longer matched `expected`; nothing changed.
    Stale {
        /// What is stored now
        current: Option<Polarity>,
    },
}

/// Evaluation collection plus the denormalized counter on each item.
pub trait EvaluationStore: Send + Sync {
    /// The evaluation `uid` holds on `item`, if any.
    fn evaluation(&self, uid: &Uid, item: &ItemId) -> MappinResult<Option<Polarity>>;

    /// Atomic conditional transition of one evaluation.
    ///
    /// If the stored evaluation for (uid, item) equals `expected`, set it to
    /// `next` (`None` deletes it) and add `delta` to the item's counter in
    /// the same step. Fails with `NotFound` when the item does not exist.
    fn compare_and_set(
        &self,
        uid: &Uid,
        item: &ItemId,
        expected: Option<Polarity>,
        next: Option<Polarity>,
        delta: i64,
    ) -> MappinResult<CasOutcome>;

    /// Current counter of `item`, or `None` if the item does not exist.
    fn counter(&self, item: &ItemId) -> MappinResult<Option<i64>>;

    /// Everyone who evaluated `item` with `polarity`.
    fn evaluators(&self, item: &ItemId, polarity: Polarity) -> MappinResult<Vec<Uid>>;
}

// =============================================================================
// Message store
// =============================================================================

/// Message collection with the store's geospatial capability.
pub trait MessageStore: Send + Sync {
    /// Insert a new message. Its id must be unused.
    fn insert_message(&self, message: MessageRecord) -> MappinResult<()>;

    /// Look up a message by id.
    fn message(&self, mid: &ItemId) -> MappinResult<Option<MessageRecord>>;

    /// Messages near a point, filtered, ordered and limited per `query`.
    fn near(&self, query: &NearQuery) -> MappinResult<Vec<MessageRecord>>;
}

// =============================================================================
// Collaborators
// =============================================================================

/// Result of [`IdentityDirectory::update_username`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The username and its change time were written.
    Renamed,
    /// The stored change time no longer matched; nothing changed.
    Stale,
    /// No such account.
    Missing,
}

/// Identity and account directory (the credential store).
pub trait IdentityDirectory: Send + Sync {
    /// Whether an identity exists.
    fn exists(&self, uid: &Uid) -> MappinResult<bool>;

    /// Look up an account by identity.
    fn account(&self, uid: &Uid) -> MappinResult<Option<AccountRecord>>;

    /// Look up an account by its unique email.
    fn account_by_email(&self, email: &str) -> MappinResult<Option<AccountRecord>>;

    /// Insert a new account; fails with `Conflict` if the email is taken.
    fn insert_account(&self, account: AccountRecord) -> MappinResult<()>;

    /// Mark an account's email as confirmed; `false` if the uid is unknown.
    fn mark_validated(&self, uid: &Uid) -> MappinResult<bool>;

    /// Record a login time; `false` if the uid is unknown.
    fn touch_last_access(&self, uid: &Uid, at: i64) -> MappinResult<bool>;

    /// Atomic conditional rename.
    ///
    /// Applies only while the stored `last_changed_name` still equals
    /// `expected_changed`, then sets it to `at`.
    fn update_username(
        &self,
        uid: &Uid,
        username: &str,
        expected_changed: i64,
        at: i64,
    ) -> MappinResult<RenameOutcome>;

    /// Store the user's last reported location; `false` if the uid is unknown.
    fn update_location(&self, uid: &Uid, location: Location) -> MappinResult<bool>;

    /// Set the profile image URL; `false` if the uid is unknown.
    fn update_image(&self, uid: &Uid, url: &str) -> MappinResult<bool>;
}

/// Password hashing primitive.
pub trait CredentialHasher: Send + Sync {
    /// Digest a secret.
    fn hash(&self, secret: &str) -> MappinResult<String>;

    /// Check a secret against a digest produced by [`hash`](Self::hash).
    fn verify(&self, secret: &str, digest: &str) -> bool;
}

/// Transactional email delivery.
pub trait Mailer: Send + Sync {
    /// Send a message and return the provider's id for it.
    fn send(&self, to: &str, subject: &str, body: &str) -> MappinResult<String>;
}

/// Blob upload.
pub trait BlobStore: Send + Sync {
    /// Store bytes and return the URL they are served from.
    fn store(&self, bytes: &[u8]) -> MappinResult<String>;
}
