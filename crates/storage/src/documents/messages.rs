//! Message collection and the near query.

use std::cmp::Ordering;

use mappin_core::traits::MessageStore;
use mappin_core::types::{FeedOrder, ItemId, MessageRecord, NearQuery};
use mappin_core::{MappinError, MappinResult};

use super::DocumentStore;

impl MessageStore for DocumentStore {
    fn insert_message(&self, message: MessageRecord) -> MappinResult<()> {
        self.write("insert_message", |t| {
            if t.messages.contains_key(&message.mid) {
                return Err(MappinError::conflict(format!(
                    "message {} already exists",
                    message.mid
                )));
            }
            t.messages.insert(message.mid.clone(), message);
            Ok(())
        })
    }

    fn message(&self, mid: &ItemId) -> MappinResult<Option<MessageRecord>> {
        self.read("message", |t| Ok(t.messages.get(mid).cloned()))
    }

    fn near(&self, query: &NearQuery) -> MappinResult<Vec<MessageRecord>> {
        self.read("near", |t| {
            let mut hits: Vec<(f64, &MessageRecord)> = t
                .messages
                .values()
                .filter(|m| {
                    query
                        .authors
                        .as_ref()
                        .map_or(true, |authors| authors.contains(&m.uid))
                })
                .map(|m| (query.center.distance_m(&m.location), m))
                .filter(|(d, _)| *d <= query.max_distance_m)
                .collect();

            // Primary key per the requested order, nearest first on ties
            hits.sort_by(|(da, a), (db, b)| {
                let primary = match query.order {
                    FeedOrder::New => b.date.cmp(&a.date),
                    FeedOrder::Top => b.eval_value.cmp(&a.eval_value),
                };
                primary.then_with(|| da.partial_cmp(db).unwrap_or(Ordering::Equal))
            });

            Ok(hits
                .into_iter()
                .take(query.limit)
                .map(|(_, m)| m.clone())
                .collect())
        })
    }
}
