//! Error taxonomy shared by every Mappin component.
//!
//! Each variant belongs to exactly one [`ErrorKind`]. Components never retry
//! on their own; they hand the error back and let the caller decide.
//!
//! | Kind | Variants |
//! |------|----------|
//! | `Validation` | [`MappinError::Validation`] |
//! | `NotFound` | [`MappinError::NotFound`] |
//! | `Conflict` | [`MappinError::Conflict`] |
//! | `Expired` | [`MappinError::Expired`] |
//! | `Invalid` | [`MappinError::InvalidToken`] |
//! | `Store` | [`MappinError::Storage`], [`MappinError::Timeout`] |

use std::fmt;

use thiserror::Error;

/// Result type alias used across the workspace.
pub type MappinResult<T> = Result<T, MappinError>;

/// Which of the two bearer credentials an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived access token.
    Access,
    /// Long-lived, single-use refresh token.
    Refresh,
    /// One-time account validation code.
    ValidationCode,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access token"),
            TokenKind::Refresh => f.write_str("refresh token"),
            TokenKind::ValidationCode => f.write_str("validation code"),
        }
    }
}

/// Coarse classification of a [`MappinError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// Referenced identity, request or record is absent.
    NotFound,
    /// Duplicate or contradictory state.
    Conflict,
    /// Token or code past validity, revoked or already consumed.
    Expired,
    /// Signature or format failure on a token.
    Invalid,
    /// Backend failure or timeout.
    Store,
}

/// The single error type of the Mappin workspace.
#[derive(Debug, Error)]
pub enum MappinError {
    /// Input failed structural or range validation.
    #[error("invalid input: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity category, e.g. "account" or "connection request"
        entity: &'static str,
        /// The key that was looked up
        key: String,
    },

    /// The operation contradicts existing state.
    #[error("conflict: {reason}")]
    Conflict {
        /// Human-readable reason
        reason: String,
    },

    /// A credential is past validity or has been revoked.
    #[error("{token} expired")]
    Expired {
        /// Which credential expired
        token: TokenKind,
    },

    /// A credential failed signature or format checks.
    #[error("invalid {token}: {reason}")]
    InvalidToken {
        /// Which credential was rejected
        token: TokenKind,
        /// Why it was rejected
        reason: String,
    },

    /// The backing store reported a failure.
    #[error("storage error: {message}")]
    Storage {
        /// Human-readable reason
        message: String,
    },

    /// A store call did not complete within its bound.
    #[error("store operation '{operation}' timed out after {duration_ms}ms")]
    Timeout {
        /// The store operation that timed out
        operation: &'static str,
        /// The bound that elapsed
        duration_ms: u64,
    },
}

impl MappinError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        MappinError::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        MappinError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        MappinError::Conflict {
            reason: reason.into(),
        }
    }

    /// Create an expiry error for the given credential.
    pub fn expired(token: TokenKind) -> Self {
        MappinError::Expired { token }
    }

    /// Create an invalid-credential error.
    pub fn invalid_token(token: TokenKind, reason: impl Into<String>) -> Self {
        MappinError::InvalidToken {
            token,
            reason: reason.into(),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        MappinError::Storage {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: &'static str, duration_ms: u64) -> Self {
        MappinError::Timeout {
            operation,
            duration_ms,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MappinError::Validation { .. } => ErrorKind::Validation,
            MappinError::NotFound { .. } => ErrorKind::NotFound,
            MappinError::Conflict { .. } => ErrorKind::Conflict,
            MappinError::Expired { .. } => ErrorKind::Expired,
            MappinError::InvalidToken { .. } => ErrorKind::Invalid,
            MappinError::Storage { .. } | MappinError::Timeout { .. } => ErrorKind::Store,
        }
    }

    /// True for expired or invalid credentials of any kind.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.kind(), ErrorKind::Expired | ErrorKind::Invalid)
    }

    /// The credential this error refers to, if any.
    pub fn token_kind(&self) -> Option<TokenKind> {
        match self {
            MappinError::Expired { token } | MappinError::InvalidToken { token, .. } => {
                Some(*token)
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MappinError {
    fn from(err: serde_json::Error) -> Self {
        MappinError::storage(format!("serialization: {}", err))
    }
}
