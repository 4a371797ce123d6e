//! Command execution layer for Mappin
//!
//! Every client request becomes a [`Command`]. The [`Executor`] resolves its
//! credentials, runs it against the wired [`Services`] and returns an
//! [`Output`], which [`Response`] wraps in the boolean-error envelope.
//!
//! # Example
//!
//! ```ignore
//! let executor = Executor::new(services);
//! let response = executor.respond(Command::Ping {
//!     auth: "Bearer eyJ...".to_string(),
//! });
//! assert!(!response.error);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod convert;
mod error;
mod executor;
mod handlers;
mod output;

pub use command::Command;
pub use error::{Error, Result};
pub use executor::{Executor, Services};
pub use output::{Output, Response};
