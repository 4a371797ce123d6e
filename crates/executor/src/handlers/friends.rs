//! Friendship command handlers.

use std::sync::Arc;

use mappin_core::Uid;
use mappin_engine::SendOutcome;

use crate::convert::convert_result;
use crate::executor::Services;
use crate::{Output, Result};

/// Handle SendRequest command.
pub fn send_request(s: &Arc<Services>, sender: &Uid, receiver: &Uid) -> Result<Output> {
    let msg = match convert_result(s.graph.send_request(sender, receiver))? {
        SendOutcome::Pending => "Friend request sent",
        SendOutcome::Connected => "Friend request accepted",
    };
    Ok(Output::Ack(msg))
}

/// Handle AcceptRequest command. `sender` sent the request to `receiver`.
pub fn accept_request(s: &Arc<Services>, sender: &Uid, receiver: &Uid) -> Result<Output> {
    convert_result(s.graph.accept_request(sender, receiver))?;
    Ok(Output::Ack("Friend request accepted"))
}

/// Handle RefuseRequest command.
pub fn refuse_request(s: &Arc<Services>, sender: &Uid, receiver: &Uid) -> Result<Output> {
    convert_result(s.graph.refuse_request(sender, receiver))?;
    Ok(Output::Ack("Friend request refused"))
}

/// Handle RemoveFriend command.
pub fn remove_friend(s: &Arc<Services>, uid: &Uid, friend: &Uid) -> Result<Output> {
    convert_result(s.graph.remove_relationship(uid, friend))?;
    Ok(Output::Ack("Friend removed"))
}

/// Handle ListFriends command.
pub fn list_friends(s: &Arc<Services>, uid: &Uid) -> Result<Output> {
    let friends = convert_result(s.graph.list_relationships(uid))?;
    Ok(Output::Uids(friends))
}

/// Handle ListRequests command.
pub fn list_requests(s: &Arc<Services>, uid: &Uid) -> Result<Output> {
    let pending = convert_result(s.graph.list_pending_requests(uid))?;
    Ok(Output::Uids(pending))
}
