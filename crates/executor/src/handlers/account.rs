//! Account and session command handlers.

use std::sync::Arc;

use mappin_core::validation::{Credentials, NewAccount};
use mappin_core::{Location, Uid};

use crate::convert::convert_result;
use crate::executor::Services;
use crate::{Output, Result};

/// Handle Signup command.
pub fn signup(s: &Arc<Services>, input: NewAccount) -> Result<Output> {
    convert_result(s.accounts.signup(&input))?;
    Ok(Output::Ack(
        "User created. Please check your email to validate your account",
    ))
}

/// Handle Login command.
pub fn login(s: &Arc<Services>, input: Credentials) -> Result<Output> {
    let pair = convert_result(s.accounts.login(&input))?;
    Ok(Output::Tokens(pair))
}

/// Handle Logout command. `token` is the bare access token.
pub fn logout(s: &Arc<Services>, token: &str) -> Result<Output> {
    convert_result(s.accounts.logout(token))?;
    Ok(Output::Ack("Successfully logged out"))
}

/// Handle Ping command.
pub fn ping(s: &Arc<Services>, token: &str) -> Result<Output> {
    let uid = convert_result(s.sessions.ping(token))?;
    Ok(Output::Uid(uid))
}

/// Handle Refresh command. `token` is the bare refresh token.
pub fn refresh(s: &Arc<Services>, token: &str) -> Result<Output> {
    let pair = convert_result(s.sessions.rotate(token))?;
    Ok(Output::Tokens(pair))
}

/// Handle Validate command.
pub fn validate(s: &Arc<Services>, code: &str) -> Result<Output> {
    convert_result(s.accounts.validate(code))?;
    Ok(Output::Ack("Account validated successfully"))
}

/// Handle UpdateUsername command.
pub fn update_username(s: &Arc<Services>, uid: &Uid, username: &str) -> Result<Output> {
    convert_result(s.accounts.update_username(uid, username))?;
    Ok(Output::Ack("Username updated successfully"))
}

/// Handle UpdateLocation command.
pub fn update_location(
    s: &Arc<Services>,
    uid: &Uid,
    latitude: f64,
    longitude: f64,
) -> Result<Output> {
    let location = convert_result(Location::new(latitude, longitude))?;
    convert_result(s.accounts.update_location(uid, location))?;
    Ok(Output::Ack("location updated successfully"))
}

/// Handle UploadImage command.
pub fn upload_image(s: &Arc<Services>, uid: &Uid, image: &str) -> Result<Output> {
    let url = convert_result(s.accounts.set_image(uid, image))?;
    Ok(Output::Url(url))
}
