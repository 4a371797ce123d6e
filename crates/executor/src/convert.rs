//! Error conversion from internal error types.
//!
//! This module provides conversions from [`MappinError`] to the executor's
//! [`Error`] type.

use mappin_core::{MappinError, TokenKind};

use crate::Error;

/// Convert a MappinError to an executor Error.
impl From<MappinError> for Error {
    fn from(err: MappinError) -> Self {
        match err {
            MappinError::Validation { message } => Error::InvalidInput { reason: message },

            MappinError::NotFound { entity, key } => {
                tracing::debug!(entity, key = %key, "not found");
                Error::NotFound {
                    entity: entity.to_string(),
                }
            }

            MappinError::Conflict { reason } => Error::Conflict { reason },

            // Credential failures: refresh expiry is the one reason a client
            // must be able to tell apart
            MappinError::Expired {
                token: TokenKind::Refresh,
            } => Error::RefreshExpired,
            MappinError::Expired {
                token: TokenKind::ValidationCode,
            }
            | MappinError::InvalidToken {
                token: TokenKind::ValidationCode,
                ..
            } => Error::CodeExpired,
            MappinError::Expired { .. } | MappinError::InvalidToken { .. } => Error::Unauthorized,

            err @ (MappinError::Storage { .. } | MappinError::Timeout { .. }) => {
                tracing::warn!(error = %err, "store failure");
                Error::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Convert a MappinResult to an executor Result.
pub fn convert_result<T>(result: mappin_core::MappinResult<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}
