//! Connection graph
//!
//! Symmetric relationships built from a directed request protocol.
//!
//! # Design
//!
//! - A request A→B and a relationship {A, B} never coexist: the store's
//!   `open_request` refuses to insert next to a relationship, and
//!   `promote_request` replaces the request with the relationship in one step.
//! - Crossed requests resolve themselves: when B requests A while A→B is
//!   pending, the call accepts A→B instead of storing B→A.
//! - If that accept loses a race (A→B was refused or withdrawn in between),
//!   the conditional insert is simply attempted again.
//!
//! # Example
//!
//! ```ignore
//! let graph = ConnectionGraph::new(store, directory);
//! graph.send_request(&alice, &bob)?;          // pending
//! graph.send_request(&bob, &alice)?;          // crossed: now connected
//! assert_eq!(graph.list_relationships(&alice)?, vec![bob]);
//! ```

use std::sync::Arc;

use mappin_core::traits::{ConnectionStore, IdentityDirectory, OpenOutcome};
use mappin_core::{ErrorKind, MappinError, MappinResult, Uid};

/// Bound on conditional-insert attempts for one `send_request` call.
pub const MAX_OPEN_ATTEMPTS: usize = 4;

/// What a `send_request` call left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A request sender→receiver is pending (new or pre-existing).
    Pending,
    /// A crossed request was found and accepted; the pair is connected.
    Connected,
}

/// Relationships and pending requests between identities.
#[derive(Clone)]
pub struct ConnectionGraph {
    store: Arc<dyn ConnectionStore>,
    directory: Arc<dyn IdentityDirectory>,
}

impl ConnectionGraph {
    /// Create a graph over `store`, checking identities against `directory`.
    pub fn new(store: Arc<dyn ConnectionStore>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { store, directory }
    }

    /// Propose a connection from `sender` to `receiver`.
    ///
    /// A duplicate request is a no-op. A pending request in the opposite
    /// direction is accepted instead of creating a new one.
    pub fn send_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<SendOutcome> {
        if sender == receiver {
            return Err(MappinError::validation(
                "cannot send a friend request to yourself",
            ));
        }
        if !self.directory.exists(receiver)? {
            return Err(MappinError::not_found("account", receiver.as_str()));
        }

        for attempt in 1..=MAX_OPEN_ATTEMPTS {
            match self.store.open_request(sender, receiver)? {
                OpenOutcome::Created => {
                    tracing::info!(sender = %sender, receiver = %receiver, "friend request sent");
                    return Ok(SendOutcome::Pending);
                }
                OpenOutcome::AlreadyPending => return Ok(SendOutcome::Pending),
                OpenOutcome::AlreadyConnected => {
                    return Err(MappinError::conflict("already connected"))
                }
                OpenOutcome::Reciprocal => match self.accept_request(receiver, sender) {
                    Ok(()) => return Ok(SendOutcome::Connected),
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        tracing::debug!(
                            sender = %sender,
                            receiver = %receiver,
                            attempt,
                            "crossed request vanished before accept, retrying"
                        );
                    }
                    Err(e) => return Err(e),
                },
            }
        }
        Err(MappinError::conflict(
            "connection state kept changing, please try again",
        ))
    }

    /// Turn the pending request sender→receiver into a relationship.
    pub fn accept_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<()> {
        if !self.store.promote_request(sender, receiver)? {
            return Err(no_such_request(sender, receiver));
        }
        tracing::info!(sender = %sender, receiver = %receiver, "friend request accepted");
        Ok(())
    }

    /// Drop the pending request sender→receiver.
    pub fn refuse_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<()> {
        if self.store.delete_request(sender, receiver)? == 0 {
            return Err(no_such_request(sender, receiver));
        }
        tracing::info!(sender = %sender, receiver = %receiver, "friend request refused");
        Ok(())
    }

    /// Remove the relationship between `a` and `b`, if any.
    pub fn remove_relationship(&self, a: &Uid, b: &Uid) -> MappinResult<()> {
        let removed = self.store.delete_relationship(a, b)?;
        tracing::info!(a = %a, b = %b, removed, "friendship removed");
        Ok(())
    }

    /// Everyone connected to `uid`, sorted.
    pub fn list_relationships(&self, uid: &Uid) -> MappinResult<Vec<Uid>> {
        let mut related = self.store.relationships_of(uid)?;
        related.sort();
        Ok(related)
    }

    /// Senders of requests pending for `uid`, sorted.
    pub fn list_pending_requests(&self, uid: &Uid) -> MappinResult<Vec<Uid>> {
        let mut senders = self.store.requests_to(uid)?;
        senders.sort();
        Ok(senders)
    }
}

fn no_such_request(sender: &Uid, receiver: &Uid) -> MappinError {
    MappinError::not_found("friend request", format!("{} -> {}", sender, receiver))
}

impl std::fmt::Debug for ConnectionGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGraph").finish_non_exhaustive()
    }
}
