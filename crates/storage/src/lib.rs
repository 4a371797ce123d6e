//! In-memory storage backends for Mappin
//!
//! - [`ExpiringStore`]: key-value store with per-key TTL (session handles,
//!   validation codes), partitionable into disjoint namespaces
//! - [`DocumentStore`]: accounts, messages, evaluations, relationships and
//!   connection requests behind one bounded lock
//! - [`MemoryBlobStore`] and [`Outbox`]: in-process blob and mail backends

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blobs;
pub mod documents;
pub mod expiring;
pub mod outbox;

pub use blobs::MemoryBlobStore;
pub use documents::DocumentStore;
pub use expiring::ExpiringStore;
pub use outbox::{Outbox, SentMail};
