//! Core types for Mappin
//!
//! This crate defines the vocabulary every other crate speaks:
//! - Identifiers: [`Uid`], [`ItemId`]
//! - Domain values: [`Polarity`], [`Location`], account and message records
//! - Error taxonomy: [`MappinError`], [`ErrorKind`], [`MappinResult`]
//! - Configuration: [`ServiceConfig`] and its sections
//! - Store and collaborator contracts: [`traits`]
//! - Structural input validation: [`validation`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

pub use config::{
    AccountsConfig, CodesConfig, FeedConfig, LedgerConfig, ServiceConfig, SessionConfig,
    StoreConfig,
};
pub use error::{ErrorKind, MappinError, MappinResult, TokenKind};
pub use types::{
    AccountRecord, FeedOrder, ItemId, Location, MessageRecord, NearQuery, Polarity, Uid,
};
