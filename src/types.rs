//! Public types for the Mappin API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Identifiers and domain values
// ============================================================================

pub use mappin_core::{FeedOrder, ItemId, Location, MessageRecord, Polarity, Uid};

// Request payloads
pub use mappin_core::validation::{Credentials, NewAccount, NewMessage};

// Configuration
pub use mappin_core::{
    AccountsConfig, CodesConfig, FeedConfig, LedgerConfig, ServiceConfig, SessionConfig,
    StoreConfig,
};

// Results
pub use mappin_engine::{FeedEntry, FeedGroup, Toggle};
pub use mappin_security::TokenPair;

// Errors and the command layer
pub use mappin_executor::{Command, Error, Executor, Output, Response, Result};

// In-process collaborator backends
pub use mappin_storage::{MemoryBlobStore, Outbox, SentMail};
