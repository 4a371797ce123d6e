//! Session security for Mappin.
//!
//! This crate provides the [`SessionManager`] that issues, validates, rotates
//! and revokes access/refresh token pairs, the one-time [`ValidationCodes`]
//! sent to new accounts, bearer header parsing and the default
//! [`CredentialHasher`](mappin_core::traits::CredentialHasher).
//!
//! ```ignore
//! use mappin_security::{bearer_token, SessionManager};
//!
//! let token = bearer_token(header).ok_or(...)?;
//! let uid = sessions.ping(token)?;
//! ```

#![warn(missing_docs)]

pub mod bearer;
pub mod codes;
pub mod hashing;
pub mod session;
pub mod token;

pub use bearer::bearer_token;
pub use codes::ValidationCodes;
pub use hashing::BcryptHasher;
pub use session::{AccessDetails, SessionManager, TokenPair};
pub use token::{ClaimKind, Claims, TokenCodec, TokenError};
