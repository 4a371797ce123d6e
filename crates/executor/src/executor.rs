//! The command executor.
//!
//! [`Executor::execute`] is the single entry point every request goes
//! through: it resolves the bearer credential of authenticated commands,
//! dispatches to the handler for the command, and maps domain errors to the
//! client-facing [`Error`].

use std::sync::Arc;

use mappin_engine::{AccountService, ConnectionGraph, EngagementLedger, MessageBoard};
use mappin_security::{bearer_token, AccessDetails, SessionManager};

use crate::convert::convert_result;
use crate::handlers::{account, friends, messages};
use crate::{Command, Error, Output, Response, Result};

/// The components commands are dispatched to.
pub struct Services {
    /// Signup, login, validation and the profile
    pub accounts: AccountService,
    /// Token issue, check and rotation
    pub sessions: Arc<SessionManager>,
    /// Friendships and requests
    pub graph: ConnectionGraph,
    /// Evaluations and counters
    pub ledger: EngagementLedger,
    /// Posting and the feed
    pub board: MessageBoard,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Executes [`Command`]s against a set of [`Services`].
#[derive(Debug, Clone)]
pub struct Executor {
    services: Arc<Services>,
}

impl Executor {
    /// Create an executor over `services`.
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }

    /// The wired components.
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Execute one command.
    pub fn execute(&self, cmd: Command) -> Result<Output> {
        let name = cmd.name();
        let result = self.dispatch(cmd);
        if let Err(ref err) = result {
            tracing::debug!(command = name, error = %err, "command failed");
        }
        result
    }

    /// Execute one command and wrap the outcome in the response envelope.
    pub fn respond(&self, cmd: Command) -> Response {
        Response::from_result(self.execute(cmd))
    }

    /// Decode a JSON command, execute it and wrap the outcome.
    pub fn respond_json(&self, raw: &str) -> Response {
        match serde_json::from_str::<Command>(raw) {
            Ok(cmd) => self.respond(cmd),
            Err(e) => {
                tracing::debug!(error = %e, "undecodable command");
                Response::failure(&Error::Serialization {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn dispatch(&self, cmd: Command) -> Result<Output> {
        let s = &self.services;
        match cmd {
            // Accounts
            Command::Signup(input) => account::signup(s, input),
            Command::Login(input) => account::login(s, input),
            Command::Logout { auth } => account::logout(s, bearer(&auth)?),
            Command::Ping { auth } => account::ping(s, bearer(&auth)?),
            Command::Refresh { auth } => account::refresh(s, bearer(&auth)?),
            Command::Validate { code } => account::validate(s, &code),
            Command::UpdateUsername { auth, new_username } => {
                let caller = self.authenticate(&auth)?;
                account::update_username(s, &caller.uid, &new_username)
            }
            Command::UpdateLocation {
                auth,
                latitude,
                longitude,
            } => {
                let caller = self.authenticate(&auth)?;
                account::update_location(s, &caller.uid, latitude, longitude)
            }
            Command::UploadImage { auth, image } => {
                let caller = self.authenticate(&auth)?;
                account::upload_image(s, &caller.uid, &image)
            }

            // Friends
            Command::SendRequest { auth, uid } => {
                let caller = self.authenticate(&auth)?;
                friends::send_request(s, &caller.uid, &uid)
            }
            Command::AcceptRequest { auth, uid } => {
                let caller = self.authenticate(&auth)?;
                friends::accept_request(s, &uid, &caller.uid)
            }
            Command::RefuseRequest { auth, uid } => {
                let caller = self.authenticate(&auth)?;
                friends::refuse_request(s, &uid, &caller.uid)
            }
            Command::RemoveFriend { auth, uid } => {
                let caller = self.authenticate(&auth)?;
                friends::remove_friend(s, &caller.uid, &uid)
            }
            Command::ListFriends { auth } => {
                let caller = self.authenticate(&auth)?;
                friends::list_friends(s, &caller.uid)
            }
            Command::ListRequests { auth } => {
                let caller = self.authenticate(&auth)?;
                friends::list_requests(s, &caller.uid)
            }

            // Messages
            Command::PostMessage { auth, message } => {
                let caller = self.authenticate(&auth)?;
                messages::post_message(s, &caller.uid, message)
            }
            Command::Nearby {
                auth,
                latitude,
                longitude,
                order,
                group,
            } => {
                let caller = self.authenticate(&auth)?;
                messages::nearby(
                    s,
                    &caller.uid,
                    latitude,
                    longitude,
                    order.as_deref(),
                    group.as_deref(),
                )
            }
            Command::Evaluate { auth, mid, eval } => {
                let caller = self.authenticate(&auth)?;
                messages::evaluate(s, &caller.uid, &mid, &eval)
            }
            Command::Evaluators { mid, eval } => messages::evaluators(s, &mid, &eval),
        }
    }

    fn authenticate(&self, auth: &str) -> Result<AccessDetails> {
        convert_result(self.services.sessions.validate_access(bearer(auth)?))
    }
}

fn bearer(auth: &str) -> Result<&str> {
    bearer_token(auth).ok_or(Error::Unauthorized)
}
