//! Commands accepted by the [`Executor`](crate::Executor).
//!
//! Authenticated commands carry the raw `Authorization` header value; the
//! executor resolves it to an identity before dispatching.

use mappin_core::validation::{Credentials, NewAccount, NewMessage};
use mappin_core::{ItemId, Uid};
use serde::Deserialize;

/// A decoded request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // Accounts
    /// Create an account.
    Signup(NewAccount),
    /// Log in with email and password.
    Login(Credentials),
    /// End the current session.
    Logout {
        /// `Bearer <access token>`
        auth: String,
    },
    /// Check an access token, returning its identity.
    Ping {
        /// `Bearer <access token>`
        auth: String,
    },
    /// Exchange a refresh token for a new pair.
    Refresh {
        /// `Bearer <refresh token>`
        auth: String,
    },
    /// Confirm an account with its emailed code.
    Validate {
        /// The code from the validation link
        code: String,
    },
    /// Rename the caller.
    UpdateUsername {
        /// `Bearer <access token>`
        auth: String,
        /// New display name
        new_username: String,
    },
    /// Store the caller's current location.
    UpdateLocation {
        /// `Bearer <access token>`
        auth: String,
        /// Latitude
        latitude: f64,
        /// Longitude
        longitude: f64,
    },
    /// Upload the caller's profile image.
    UploadImage {
        /// `Bearer <access token>`
        auth: String,
        /// Base64-encoded image bytes
        image: String,
    },

    // Friends
    /// Send a friend request to `uid`.
    SendRequest {
        /// `Bearer <access token>`
        auth: String,
        /// Receiver
        uid: Uid,
    },
    /// Accept the request `uid` sent to the caller.
    AcceptRequest {
        /// `Bearer <access token>`
        auth: String,
        /// Sender
        uid: Uid,
    },
    /// Refuse the request `uid` sent to the caller.
    RefuseRequest {
        /// `Bearer <access token>`
        auth: String,
        /// Sender
        uid: Uid,
    },
    /// Stop being friends with `uid`.
    RemoveFriend {
        /// `Bearer <access token>`
        auth: String,
        /// Former friend
        uid: Uid,
    },
    /// The caller's friends.
    ListFriends {
        /// `Bearer <access token>`
        auth: String,
    },
    /// Pending requests addressed to the caller.
    ListRequests {
        /// `Bearer <access token>`
        auth: String,
    },

    // Messages
    /// Post a message.
    PostMessage {
        /// `Bearer <access token>`
        auth: String,
        /// Message payload
        message: NewMessage,
    },
    /// Messages around a point.
    Nearby {
        /// `Bearer <access token>`
        auth: String,
        /// Latitude of the caller
        latitude: f64,
        /// Longitude of the caller
        longitude: f64,
        /// `new` or `top` (default)
        #[serde(default)]
        order: Option<String>,
        /// `friends`, or everyone when absent
        #[serde(default)]
        group: Option<String>,
    },
    /// Toggle the caller's evaluation of a message.
    Evaluate {
        /// `Bearer <access token>`
        auth: String,
        /// Message id
        mid: ItemId,
        /// `upvote` or `downvote`
        eval: String,
    },
    /// Who evaluated a message with a given polarity.
    Evaluators {
        /// Message id
        mid: ItemId,
        /// `upvote` or `downvote`
        eval: String,
    },
}

impl Command {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Signup(_) => "signup",
            Command::Login(_) => "login",
            Command::Logout { .. } => "logout",
            Command::Ping { .. } => "ping",
            Command::Refresh { .. } => "refresh",
            Command::Validate { .. } => "validate",
            Command::UpdateUsername { .. } => "update_username",
            Command::UpdateLocation { .. } => "update_location",
            Command::UploadImage { .. } => "upload_image",
            Command::SendRequest { .. } => "send_request",
            Command::AcceptRequest { .. } => "accept_request",
            Command::RefuseRequest { .. } => "refuse_request",
            Command::RemoveFriend { .. } => "remove_friend",
            Command::ListFriends { .. } => "list_friends",
            Command::ListRequests { .. } => "list_requests",
            Command::PostMessage { .. } => "post_message",
            Command::Nearby { .. } => "nearby",
            Command::Evaluate { .. } => "evaluate",
            Command::Evaluators { .. } => "evaluators",
        }
    }
}
