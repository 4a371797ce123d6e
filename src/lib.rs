//! Mappin: location-based posting with sessions, friendships and votes
//!
//! The [`Mappin`] facade wires the in-memory backends, the security layer and
//! the domain components into one [`Executor`], and exposes a typed method
//! per command on top of it.
//!
//! # Example
//!
//! ```ignore
//! use mappin::{init_tracing, Mappin, ServiceConfig};
//!
//! init_tracing("info");
//! let app = Mappin::in_memory(ServiceConfig::with_secrets("a-secret", "r-secret"))?;
//! let pair = app.login("ana@example.com", "hunter2hunter2")?;
//! let me = app.ping(&pair.access_token)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod types;

use std::sync::Arc;

use mappin_engine::{AccountService, ConnectionGraph, EngagementLedger, MessageBoard};
use mappin_executor::Services;
use mappin_security::{BcryptHasher, SessionManager, ValidationCodes};
use mappin_storage::{DocumentStore, ExpiringStore};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

pub use types::*;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than
/// once, or after another subscriber was installed, is a no-op.
pub fn init_tracing(default_filter: &str) {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// A fully wired Mappin service.
#[derive(Debug, Clone)]
pub struct Mappin {
    executor: Executor,
    ephemeral: ExpiringStore,
    outbox: Outbox,
    blobs: MemoryBlobStore,
}

impl Mappin {
    /// Build a service over fresh in-memory stores.
    ///
    /// Session handles and validation codes live in disjoint partitions of
    /// one expiring store.
    pub fn in_memory(config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        let ephemeral = ExpiringStore::new();
        let docs = Arc::new(DocumentStore::with_config(&config.store));
        let outbox = Outbox::with_sender(config.accounts.sender.clone());
        let blobs = MemoryBlobStore::new();

        let sessions = Arc::new(SessionManager::new(
            Arc::new(ephemeral.partition("tokens")),
            &config.session,
        )?);
        let codes = Arc::new(ValidationCodes::new(
            Arc::new(ephemeral.partition("codes")),
            &config.codes,
        ));

        let graph = ConnectionGraph::new(docs.clone(), docs.clone());
        let ledger = EngagementLedger::new(docs.clone(), &config.ledger);
        let board = MessageBoard::new(
            docs.clone(),
            Arc::new(blobs.clone()),
            graph.clone(),
            ledger.clone(),
            &config.feed,
        );
        let accounts = AccountService::new(
            docs,
            Arc::new(BcryptHasher::with_cost(config.accounts.password_cost)),
            Arc::new(outbox.clone()),
            Arc::new(blobs.clone()),
            codes,
            sessions.clone(),
            &config,
        );

        tracing::info!("mappin service wired over in-memory stores");
        Ok(Self {
            executor: Executor::new(Services {
                accounts,
                sessions,
                graph,
                ledger,
                board,
            }),
            ephemeral,
            outbox,
            blobs,
        })
    }

    /// The command executor behind the typed methods.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Mail sent by the service.
    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Uploaded images.
    pub fn blobs(&self) -> &MemoryBlobStore {
        &self.blobs
    }

    /// Drop expired session handles and codes; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.ephemeral.purge_expired()
    }

    // =========================================================================
    // Accounts (9)
    // =========================================================================

    /// Create an account and mail its validation link.
    pub fn signup(&self, username: &str, email: &str, password: &str) -> Result<()> {
        self.ack(Command::Signup(NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    /// Confirm an account with the code from its validation link.
    pub fn validate(&self, code: &str) -> Result<()> {
        self.ack(Command::Validate {
            code: code.to_string(),
        })
    }

    /// Log in, returning a fresh token pair.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair> {
        self.tokens(Command::Login(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    /// End the session behind `access_token`.
    pub fn logout(&self, access_token: &str) -> Result<()> {
        self.ack(Command::Logout {
            auth: bearer(access_token),
        })
    }

    /// Identity behind `access_token`.
    pub fn ping(&self, access_token: &str) -> Result<Uid> {
        match self.executor.execute(Command::Ping {
            auth: bearer(access_token),
        })? {
            Output::Uid(uid) => Ok(uid),
            _ => Err(unexpected("Ping")),
        }
    }

    /// Exchange a refresh token for a new pair. Each refresh token works once.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        self.tokens(Command::Refresh {
            auth: bearer(refresh_token),
        })
    }

    /// Rename the caller.
    pub fn update_username(&self, access_token: &str, username: &str) -> Result<()> {
        self.ack(Command::UpdateUsername {
            auth: bearer(access_token),
            new_username: username.to_string(),
        })
    }

    /// Store the caller's current location.
    pub fn update_location(&self, access_token: &str, location: Location) -> Result<()> {
        self.ack(Command::UpdateLocation {
            auth: bearer(access_token),
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }

    /// Upload a base64 profile image, returning its URL.
    pub fn upload_image(&self, access_token: &str, image_base64: &str) -> Result<String> {
        match self.executor.execute(Command::UploadImage {
            auth: bearer(access_token),
            image: image_base64.to_string(),
        })? {
            Output::Url(url) => Ok(url),
            _ => Err(unexpected("UploadImage")),
        }
    }

    // =========================================================================
    // Friends (6)
    // =========================================================================

    /// Ask `to` to be friends.
    pub fn send_request(&self, access_token: &str, to: &Uid) -> Result<()> {
        self.ack(Command::SendRequest {
            auth: bearer(access_token),
            uid: to.clone(),
        })
    }

    /// Accept the request `from` sent to the caller.
    pub fn accept_request(&self, access_token: &str, from: &Uid) -> Result<()> {
        self.ack(Command::AcceptRequest {
            auth: bearer(access_token),
            uid: from.clone(),
        })
    }

    /// Refuse the request `from` sent to the caller.
    pub fn refuse_request(&self, access_token: &str, from: &Uid) -> Result<()> {
        self.ack(Command::RefuseRequest {
            auth: bearer(access_token),
            uid: from.clone(),
        })
    }

    /// Stop being friends with `friend`.
    pub fn remove_friend(&self, access_token: &str, friend: &Uid) -> Result<()> {
        self.ack(Command::RemoveFriend {
            auth: bearer(access_token),
            uid: friend.clone(),
        })
    }

    /// The caller's friends.
    pub fn friends(&self, access_token: &str) -> Result<Vec<Uid>> {
        self.uids(Command::ListFriends {
            auth: bearer(access_token),
        })
    }

    /// Who is waiting for the caller to answer a request.
    pub fn pending_requests(&self, access_token: &str) -> Result<Vec<Uid>> {
        self.uids(Command::ListRequests {
            auth: bearer(access_token),
        })
    }

    // =========================================================================
    // Messages (4)
    // =========================================================================

    /// Post a message.
    pub fn post(&self, access_token: &str, message: NewMessage) -> Result<MessageRecord> {
        match self.executor.execute(Command::PostMessage {
            auth: bearer(access_token),
            message,
        })? {
            Output::Posted(record) => Ok(record),
            _ => Err(unexpected("PostMessage")),
        }
    }

    /// Messages around `at`.
    pub fn nearby(
        &self,
        access_token: &str,
        at: Location,
        order: FeedOrder,
        group: FeedGroup,
    ) -> Result<Vec<FeedEntry>> {
        let order = match order {
            FeedOrder::New => "new",
            FeedOrder::Top => "top",
        };
        let group = match group {
            FeedGroup::Friends => Some("friends".to_string()),
            FeedGroup::Everyone => None,
        };
        match self.executor.execute(Command::Nearby {
            auth: bearer(access_token),
            latitude: at.latitude,
            longitude: at.longitude,
            order: Some(order.to_string()),
            group,
        })? {
            Output::Feed(entries) => Ok(entries),
            _ => Err(unexpected("Nearby")),
        }
    }

    /// Toggle the caller's evaluation of `mid`.
    pub fn evaluate(
        &self,
        access_token: &str,
        mid: &ItemId,
        polarity: Polarity,
    ) -> Result<Toggle> {
        match self.executor.execute(Command::Evaluate {
            auth: bearer(access_token),
            mid: mid.clone(),
            eval: polarity.as_str().to_string(),
        })? {
            Output::Evaluated {
                evaluation,
                counter,
            } => Ok(Toggle {
                evaluation,
                counter,
            }),
            _ => Err(unexpected("Evaluate")),
        }
    }

    /// Who evaluated `mid` with `polarity`.
    pub fn evaluators(&self, mid: &ItemId, polarity: Polarity) -> Result<Vec<Uid>> {
        self.uids(Command::Evaluators {
            mid: mid.clone(),
            eval: polarity.as_str().to_string(),
        })
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn ack(&self, cmd: Command) -> Result<()> {
        let name = cmd.name();
        match self.executor.execute(cmd)? {
            Output::Ack(_) => Ok(()),
            _ => Err(unexpected(name)),
        }
    }

    fn tokens(&self, cmd: Command) -> Result<TokenPair> {
        let name = cmd.name();
        match self.executor.execute(cmd)? {
            Output::Tokens(pair) => Ok(pair),
            _ => Err(unexpected(name)),
        }
    }

    fn uids(&self, cmd: Command) -> Result<Vec<Uid>> {
        let name = cmd.name();
        match self.executor.execute(cmd)? {
            Output::Uids(uids) => Ok(uids),
            _ => Err(unexpected(name)),
        }
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn unexpected(command: &str) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {}", command),
    }
}
