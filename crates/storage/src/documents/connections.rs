//! Relationship and connection-request collections.

use mappin_core::traits::{ConnectionStore, OpenOutcome};
use mappin_core::types::Uid;
use mappin_core::MappinResult;

use super::{pair_key, DocumentStore};

impl ConnectionStore for DocumentStore {
    fn open_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<OpenOutcome> {
        self.write("open_request", |t| {
            if t.relationships.contains(&pair_key(sender, receiver)) {
                return Ok(OpenOutcome::AlreadyConnected);
            }
            if t.requests.contains(&(receiver.clone(), sender.clone())) {
                return Ok(OpenOutcome::Reciprocal);
            }
            if t.requests.insert((sender.clone(), receiver.clone())) {
                Ok(OpenOutcome::Created)
            } else {
                Ok(OpenOutcome::AlreadyPending)
            }
        })
    }

    fn promote_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<bool> {
        self.write("promote_request", |t| {
            if !t.requests.remove(&(sender.clone(), receiver.clone())) {
                return Ok(false);
            }
            t.requests.remove(&(receiver.clone(), sender.clone()));
            t.relationships.insert(pair_key(sender, receiver));
            Ok(true)
        })
    }

    fn delete_request(&self, sender: &Uid, receiver: &Uid) -> MappinResult<u64> {
        self.write("delete_request", |t| {
            Ok(t.requests.remove(&(sender.clone(), receiver.clone())) as u64)
        })
    }

    fn delete_relationship(&self, a: &Uid, b: &Uid) -> MappinResult<u64> {
        self.write("delete_relationship", |t| {
            Ok(t.relationships.remove(&pair_key(a, b)) as u64)
        })
    }

    fn relationship_exists(&self, a: &Uid, b: &Uid) -> MappinResult<bool> {
        self.read("relationship_exists", |t| {
            Ok(t.relationships.contains(&pair_key(a, b)))
        })
    }

    fn request_exists(&self, sender: &Uid, receiver: &Uid) -> MappinResult<bool> {
        self.read("request_exists", |t| {
            Ok(t.requests.contains(&(sender.clone(), receiver.clone())))
        })
    }

    fn relationships_of(&self, uid: &Uid) -> MappinResult<Vec<Uid>> {
        self.read("relationships_of", |t| {
            Ok(t.relationships
                .iter()
                .filter_map(|(a, b)| {
                    if a == uid {
                        Some(b.clone())
                    } else if b == uid {
                        Some(a.clone())
                    } else {
                        None
                    }
                })
                .collect())
        })
    }

    fn requests_to(&self, uid: &Uid) -> MappinResult<Vec<Uid>> {
        self.read("requests_to", |t| {
            Ok(t.requests
                .iter()
                .filter(|(_, receiver)| receiver == uid)
                .map(|(sender, _)| sender.clone())
                .collect())
        })
    }
}
