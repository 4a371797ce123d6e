//! Mappin domain components
//!
//! - [`ConnectionGraph`]: friendships built from directed requests, with
//!   crossed requests resolving into a friendship
//! - [`EngagementLedger`]: per-user upvote/downvote toggles and the item
//!   counter they maintain
//! - [`AccountService`]: signup, validation, login, logout, renames
//! - [`MessageBoard`]: posting and the location feed
//!
//! Every component receives its stores as trait objects at construction and
//! holds no other shared state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accounts;
pub mod board;
pub mod connections;
pub mod ledger;

pub use accounts::AccountService;
pub use board::{FeedEntry, FeedGroup, MessageBoard};
pub use connections::{ConnectionGraph, SendOutcome, MAX_OPEN_ATTEMPTS};
pub use ledger::{transition, EngagementLedger, Toggle};
