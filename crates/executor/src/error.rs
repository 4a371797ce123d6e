//! Errors as they cross the request boundary.

use thiserror::Error;

/// Executor result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Client-facing error.
///
/// Expired, revoked and badly signed access credentials all collapse into
/// [`Error::Unauthorized`]; only refresh expiry stays distinct, so a client
/// knows whether to log in again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed or out-of-range input.
    #[error("{reason}")]
    InvalidInput {
        /// Human-readable reason
        reason: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound {
        /// What was missing
        entity: String,
    },

    /// The request contradicts existing state.
    #[error("{reason}")]
    Conflict {
        /// Human-readable reason
        reason: String,
    },

    /// Missing, invalid, expired or revoked access credential.
    #[error("Unauthorized")]
    Unauthorized,

    /// The refresh token expired or was already used.
    #[error("Refresh token expired")]
    RefreshExpired,

    /// Validation code unknown, used or expired.
    #[error("code does not exist or expired")]
    CodeExpired,

    /// Backend failure or timeout.
    #[error("An error occurred, please try again")]
    Unavailable {
        /// Internal detail, logged but not shown
        reason: String,
    },

    /// The executor returned an output the caller did not expect.
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },

    /// A request or result could not be encoded.
    #[error("error processing information")]
    Serialization {
        /// Internal detail
        reason: String,
    },
}
