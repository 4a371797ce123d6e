//! Evaluation collection and item counters.

use mappin_core::traits::{CasOutcome, EvaluationStore};
use mappin_core::types::{ItemId, Polarity, Uid};
use mappin_core::{MappinError, MappinResult};

use super::DocumentStore;

impl EvaluationStore for DocumentStore {
    fn evaluation(&self, uid: &Uid, item: &ItemId) -> MappinResult<Option<Polarity>> {
        self.read("evaluation", |t| {
            Ok(t.evaluations.get(&(uid.clone(), item.clone())).copied())
        })
    }

    fn compare_and_set(
        &self,
        uid: &Uid,
        item: &ItemId,
        expected: Option<Polarity>,
        next: Option<Polarity>,
        delta: i64,
    ) -> MappinResult<CasOutcome> {
        self.write("compare_and_set", |t| {
            if !t.messages.contains_key(item) {
                return Err(MappinError::not_found("message", item.as_str()));
            }
            let key = (uid.clone(), item.clone());
            let current = t.evaluations.get(&key).copied();
            if current != expected {
                return Ok(CasOutcome::Stale { current });
            }
            match next {
                Some(polarity) => {
                    t.evaluations.insert(key, polarity);
                }
                None => {
                    t.evaluations.remove(&key);
                }
            }
            let message = t
                .messages
                .get_mut(item)
                .ok_or_else(|| MappinError::not_found("message", item.as_str()))?;
            message.eval_value += delta;
            Ok(CasOutcome::Applied {
                counter: message.eval_value,
            })
        })
    }

    fn counter(&self, item: &ItemId) -> MappinResult<Option<i64>> {
        self.read("counter", |t| Ok(t.messages.get(item).map(|m| m.eval_value)))
    }

    fn evaluators(&self, item: &ItemId, polarity: Polarity) -> MappinResult<Vec<Uid>> {
        self.read("evaluators", |t| {
            Ok(t.evaluations
                .iter()
                .filter(|((_, mid), p)| mid == item && **p == polarity)
                .map(|((uid, _), _)| uid.clone())
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mappin_core::traits::MessageStore;
    use mappin_core::types::{Location, MessageRecord};
    use mappin_core::ErrorKind;

    fn store_with_item(mid: &str) -> DocumentStore {
        let store = DocumentStore::new();
        store
            .insert_message(MessageRecord {
                mid: ItemId::from(mid),
                uid: Uid::from("author"),
                title: "t".to_string(),
                text: "x".to_string(),
                image: None,
                date: 0,
                location: Location {
                    latitude: 0.0,
                    longitude: 0.0,
                },
                eval_value: 0,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_cas_applies_when_expected_matches() {
        let store = store_with_item("m1");
        let (u, m) = (Uid::from("u1"), ItemId::from("m1"));

        let out = store
            .compare_and_set(&u, &m, None, Some(Polarity::Up), 1)
            .unwrap();
        assert_eq!(out, CasOutcome::Applied { counter: 1 });
        assert_eq!(store.evaluation(&u, &m).unwrap(), Some(Polarity::Up));
        assert_eq!(store.counter(&m).unwrap(), Some(1));
    }

    #[test]
    fn test_cas_stale_changes_nothing() {
        let store = store_with_item("m1");
        let (u, m) = (Uid::from("u1"), ItemId::from("m1"));
        store
            .compare_and_set(&u, &m, None, Some(Polarity::Up), 1)
            .unwrap();

        let out = store
            .compare_and_set(&u, &m, None, Some(Polarity::Down), -1)
            .unwrap();
        assert_eq!(
            out,
            CasOutcome::Stale {
                current: Some(Polarity::Up)
            }
        );
        assert_eq!(store.counter(&m).unwrap(), Some(1));
    }

    #[test]
    fn test_cas_delete() {
        let store = store_with_item("m1");
        let (u, m) = (Uid::from("u1"), ItemId::from("m1"));
        store
            .compare_and_set(&u, &m, None, Some(Polarity::Down), -1)
            .unwrap();
        store
            .compare_and_set(&u, &m, Some(Polarity::Down), None, 1)
            .unwrap();

        assert_eq!(store.evaluation(&u, &m).unwrap(), None);
        assert_eq!(store.counter(&m).unwrap(), Some(0));
    }

    #[test]
    fn test_cas_on_missing_item_is_not_found() {
        let store = DocumentStore::new();
        let err = store
            .compare_and_set(&Uid::from("u1"), &ItemId::from("nope"), None, Some(Polarity::Up), 1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(store.counter(&ItemId::from("nope")).unwrap(), None);
    }

    #[test]
    fn test_evaluators_by_polarity() {
        let store = store_with_item("m1");
        let m = ItemId::from("m1");
        for (name, p) in [("a", Polarity::Up), ("b", Polarity::Down), ("c", Polarity::Up)] {
            store
                .compare_and_set(&Uid::from(name), &m, None, Some(p), p.weight())
                .unwrap();
        }

        let mut ups = store.evaluators(&m, Polarity::Up).unwrap();
        ups.sort();
        assert_eq!(ups, vec![Uid::from("a"), Uid::from("c")]);
        assert_eq!(store.evaluators(&m, Polarity::Down).unwrap(), vec![Uid::from("b")]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_next() -> impl Strategy<Value = Option<Polarity>> {
            prop_oneof![Just(None), Just(Some(Polarity::Up)), Just(Some(Polarity::Down))]
        }

        fn weight(p: Option<Polarity>) -> i64 {
            p.map_or(0, Polarity::weight)
        }

        proptest! {
            /// After any sequence of applied transitions the counter equals
            /// ups minus downs over the stored evaluations.
            #[test]
            fn prop_counter_matches_stored_evaluations(
                steps in proptest::collection::vec((0usize..4, arb_next()), 1..64)
            ) {
                let store = store_with_item("m1");
                let m = ItemId::from("m1");

                for (who, next) in steps {
                    let uid = Uid::new(format!("u{}", who));
                    let current = store.evaluation(&uid, &m).unwrap();
                    let delta = weight(next) - weight(current);
                    let out = store.compare_and_set(&uid, &m, current, next, delta).unwrap();
                    prop_assert!(matches!(out, CasOutcome::Applied { .. }), "expected CasOutcome::Applied");
                }

                let ups = store.evaluators(&m, Polarity::Up).unwrap().len() as i64;
                let downs = store.evaluators(&m, Polarity::Down).unwrap().len() as i64;
                prop_assert_eq!(store.counter(&m).unwrap(), Some(ups - downs));
            }
        }
    }
}
