//! Message and evaluation command handlers.

use std::sync::Arc;

use mappin_core::validation::NewMessage;
use mappin_core::{FeedOrder, ItemId, Location, Polarity, Uid};
use mappin_engine::FeedGroup;

use crate::convert::convert_result;
use crate::executor::Services;
use crate::{Output, Result};

/// Handle PostMessage command.
pub fn post_message(s: &Arc<Services>, uid: &Uid, message: NewMessage) -> Result<Output> {
    let posted = convert_result(s.board.post(uid, &message))?;
    Ok(Output::Posted(posted))
}

/// Handle Nearby command.
pub fn nearby(
    s: &Arc<Services>,
    uid: &Uid,
    latitude: f64,
    longitude: f64,
    order: Option<&str>,
    group: Option<&str>,
) -> Result<Output> {
    let at = convert_result(Location::new(latitude, longitude))?;
    let entries = convert_result(s.board.nearby(
        uid,
        at,
        FeedOrder::parse(order),
        FeedGroup::parse(group),
    ))?;
    Ok(Output::Feed(entries))
}

/// Handle Evaluate command.
pub fn evaluate(s: &Arc<Services>, uid: &Uid, mid: &ItemId, eval: &str) -> Result<Output> {
    let polarity = convert_result(eval.parse::<Polarity>())?;
    let toggle = convert_result(s.ledger.toggle(uid, mid, polarity))?;
    Ok(Output::Evaluated {
        evaluation: toggle.evaluation,
        counter: toggle.counter,
    })
}

/// Handle Evaluators command.
pub fn evaluators(s: &Arc<Services>, mid: &ItemId, eval: &str) -> Result<Output> {
    let polarity = convert_result(eval.parse::<Polarity>())?;
    let uids = convert_result(s.ledger.evaluators(mid, polarity))?;
    Ok(Output::Uids(uids))
}
