//! Engagement ledger
//!
//! One evaluation per (identity, item) and the item's counter, kept equal to
//! ups minus downs.
//!
//! # Design
//!
//! The toggle is a pure transition on the prior evaluation:
//!
//! | existing | requested | next | Δcounter |
//! |----------|-----------|------|----------|
//! | none | up | up | +1 |
//! | none | down | down | −1 |
//! | up | up | none | −1 |
//! | down | down | none | +1 |
//! | up | down | down | −2 |
//! | down | up | up | +2 |
//!
//! The write is a compare-and-set on the prior evaluation, applied together
//! with the counter delta. A stale prior means a concurrent toggle won; the
//! transition is recomputed from what is stored now and retried, up to
//! `max_cas_attempts`.

use std::sync::Arc;

use mappin_core::traits::{CasOutcome, EvaluationStore};
use mappin_core::{ItemId, LedgerConfig, MappinError, MappinResult, Polarity, Uid};

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// The caller's evaluation afterwards (`None` = removed)
    pub evaluation: Option<Polarity>,
    /// The item's counter afterwards
    pub counter: i64,
}

/// Apply a toggle to the prior evaluation: the next state and counter delta.
pub fn transition(existing: Option<Polarity>, requested: Polarity) -> (Option<Polarity>, i64) {
    match existing {
        None => (Some(requested), requested.weight()),
        Some(prior) if prior == requested => (None, -prior.weight()),
        Some(prior) => (Some(requested), requested.weight() - prior.weight()),
    }
}

/// Evaluations and counters of items.
#[derive(Clone)]
pub struct EngagementLedger {
    store: Arc<dyn EvaluationStore>,
    max_attempts: u32,
}

impl EngagementLedger {
    /// Create a ledger over `store`.
    pub fn new(store: Arc<dyn EvaluationStore>, config: &LedgerConfig) -> Self {
        Self {
            store,
            max_attempts: config.max_cas_attempts.max(1),
        }
    }

    /// Toggle `uid`'s evaluation of `item` toward `polarity`.
    pub fn toggle(&self, uid: &Uid, item: &ItemId, polarity: Polarity) -> MappinResult<Toggle> {
        let mut existing = self.store.evaluation(uid, item)?;

        for attempt in 1..=self.max_attempts {
            let (next, delta) = transition(existing, polarity);
            match self
                .store
                .compare_and_set(uid, item, existing, next, delta)?
            {
                CasOutcome::Applied { counter } => {
                    tracing::info!(
                        uid = %uid,
                        item = %item,
                        evaluation = ?next,
                        counter,
                        "evaluation toggled"
                    );
                    return Ok(Toggle {
                        evaluation: next,
                        counter,
                    });
                }
                CasOutcome::Stale { current } => {
                    tracing::debug!(uid = %uid, item = %item, attempt, "evaluation changed, retrying");
                    existing = current;
                }
            }
        }

        tracing::warn!(uid = %uid, item = %item, attempts = self.max_attempts, "toggle gave up");
        Err(MappinError::conflict(
            "evaluation kept changing, please try again",
        ))
    }

    /// How `uid` evaluated `item`, if at all.
    pub fn get_evaluation(&self, uid: &Uid, item: &ItemId) -> MappinResult<Option<Polarity>> {
        self.store.evaluation(uid, item)
    }

    /// Current counter of `item`.
    pub fn counter(&self, item: &ItemId) -> MappinResult<i64> {
        self.store
            .counter(item)?
            .ok_or_else(|| MappinError::not_found("message", item.as_str()))
    }

    /// Everyone who evaluated `item` with `polarity`, sorted.
    pub fn evaluators(&self, item: &ItemId, polarity: Polarity) -> MappinResult<Vec<Uid>> {
        if self.store.counter(item)?.is_none() {
            return Err(MappinError::not_found("message", item.as_str()));
        }
        let mut uids = self.store.evaluators(item, polarity)?;
        uids.sort();
        Ok(uids)
    }
}

impl std::fmt::Debug for EngagementLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementLedger")
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
