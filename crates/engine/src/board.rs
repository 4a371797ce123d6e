//! Message board: posting and the location feed.
//!
//! The geospatial search itself belongs to the message store; the board
//! validates input, uploads images, restricts authors for the friends feed
//! and annotates each result with the caller's own evaluation.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use mappin_core::traits::{BlobStore, MessageStore};
use mappin_core::validation::{NewMessage, Validate};
use mappin_core::{
    FeedConfig, FeedOrder, ItemId, Location, MappinError, MappinResult, MessageRecord, NearQuery,
    Polarity, Uid,
};
use serde::Serialize;

use crate::connections::ConnectionGraph;
use crate::ledger::EngagementLedger;

/// Whose messages a feed shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedGroup {
    /// Every author.
    #[default]
    Everyone,
    /// Only the caller's friends.
    Friends,
}

impl FeedGroup {
    /// Parse a client-supplied group; anything but `friends` means everyone.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("friends") => FeedGroup::Friends,
            _ => FeedGroup::Everyone,
        }
    }
}

/// A feed result: the message plus how the caller evaluated it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEntry {
    /// The message
    #[serde(flatten)]
    pub message: MessageRecord,
    /// The caller's evaluation
    #[serde(rename = "user_eval", skip_serializing_if = "Option::is_none")]
    pub my_evaluation: Option<Polarity>,
}

/// Posting and reading messages around a location.
pub struct MessageBoard {
    messages: Arc<dyn MessageStore>,
    blobs: Arc<dyn BlobStore>,
    graph: ConnectionGraph,
    ledger: EngagementLedger,
    feed: FeedConfig,
}

impl MessageBoard {
    /// Wire the board to its stores and components.
    pub fn new(
        messages: Arc<dyn MessageStore>,
        blobs: Arc<dyn BlobStore>,
        graph: ConnectionGraph,
        ledger: EngagementLedger,
        feed: &FeedConfig,
    ) -> Self {
        Self {
            messages,
            blobs,
            graph,
            ledger,
            feed: feed.clone(),
        }
    }

    /// Post a message as `uid`. The counter starts at zero.
    pub fn post(&self, uid: &Uid, input: &NewMessage) -> MappinResult<MessageRecord> {
        input.validate()?;

        let image = match &input.image {
            Some(encoded) => {
                let bytes = STANDARD
                    .decode(encoded)
                    .map_err(|_| MappinError::validation("image must be base64"))?;
                Some(self.blobs.store(&bytes)?)
            }
            None => None,
        };

        let message = MessageRecord {
            mid: ItemId::generate(),
            uid: uid.clone(),
            title: input.title.clone(),
            text: input.text.clone(),
            image,
            date: Utc::now().timestamp(),
            location: input.location(),
            eval_value: 0,
        };
        self.messages.insert_message(message.clone())?;
        tracing::info!(uid = %uid, mid = %message.mid, "message posted");
        Ok(message)
    }

    /// Messages within the configured radius of `at`.
    pub fn nearby(
        &self,
        uid: &Uid,
        at: Location,
        order: FeedOrder,
        group: FeedGroup,
    ) -> MappinResult<Vec<FeedEntry>> {
        at.validate()?;
        let authors = match group {
            FeedGroup::Everyone => None,
            FeedGroup::Friends => Some(self.graph.list_relationships(uid)?),
        };

        let found = self.messages.near(&NearQuery {
            center: at,
            max_distance_m: self.feed.radius_m,
            authors,
            order,
            limit: self.feed.limit,
        })?;

        found
            .into_iter()
            .map(|message| {
                let my_evaluation = self.ledger.get_evaluation(uid, &message.mid)?;
                Ok(FeedEntry {
                    message,
                    my_evaluation,
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for MessageBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBoard")
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}
