//! Command results and the response envelope.

use mappin_core::{MessageRecord, Polarity, Uid};
use mappin_engine::FeedEntry;
use mappin_security::TokenPair;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// Successful result of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Nothing to return beyond a confirmation message.
    Ack(&'static str),
    /// A new session pair.
    Tokens(TokenPair),
    /// One identity.
    Uid(Uid),
    /// A list of identities.
    Uids(Vec<Uid>),
    /// Where an uploaded blob is served from.
    Url(String),
    /// A freshly posted message.
    Posted(MessageRecord),
    /// Feed results.
    Feed(Vec<FeedEntry>),
    /// The state after an evaluation toggle.
    Evaluated {
        /// The caller's evaluation afterwards
        evaluation: Option<Polarity>,
        /// The message counter afterwards
        counter: i64,
    },
}

#[derive(Serialize)]
struct EvaluatedData {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_eval: Option<Polarity>,
    eval_value: i64,
}

impl Output {
    /// Confirmation message for the response envelope.
    pub fn message(&self) -> &'static str {
        match self {
            Output::Ack(msg) => *msg,
            Output::Tokens(_) => "Successfully logged in",
            Output::Uid(_) => "",
            Output::Uids(_) => "Request successfully completed",
            Output::Url(_) => "",
            Output::Posted(_) => "Message posted successfully",
            Output::Feed(_) => "Request successfully completed",
            Output::Evaluated { .. } => "Likes/Dislikes updated successfully",
        }
    }

    /// JSON payload for the response envelope.
    pub fn data(&self) -> Result<Option<Value>> {
        let value = match self {
            Output::Ack(_) => return Ok(None),
            Output::Tokens(pair) => serde_json::to_value(pair),
            Output::Uid(uid) => serde_json::to_value(uid),
            Output::Uids(uids) => serde_json::to_value(uids),
            Output::Url(url) => serde_json::to_value(url),
            Output::Posted(message) => serde_json::to_value(message),
            Output::Feed(entries) => serde_json::to_value(entries),
            Output::Evaluated {
                evaluation,
                counter,
            } => serde_json::to_value(EvaluatedData {
                user_eval: *evaluation,
                eval_value: *counter,
            }),
        };
        value.map(Some).map_err(|e| Error::Serialization {
            reason: e.to_string(),
        })
    }
}

/// Boolean-error envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Whether the command failed
    pub error: bool,
    /// Human-readable outcome
    #[serde(skip_serializing_if = "String::is_empty")]
    pub msg: String,
    /// Command payload, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    /// A failed response carrying only the error message.
    pub fn failure(err: &Error) -> Self {
        Self {
            error: true,
            msg: err.to_string(),
            data: None,
        }
    }

    /// Wrap a command result.
    pub fn from_result(result: Result<Output>) -> Self {
        let output = match result {
            Ok(output) => output,
            Err(err) => return Self::failure(&err),
        };
        match output.data() {
            Ok(data) => Self {
                error: false,
                msg: output.message().to_string(),
                data,
            },
            Err(err) => Self::failure(&err),
        }
    }
}
