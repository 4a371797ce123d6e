//! Command handlers, one module per domain area.
//!
//! Handlers receive already-authenticated identities; bearer parsing and
//! session checks happen in the [`Executor`](crate::Executor).

pub mod account;
pub mod friends;
pub mod messages;
