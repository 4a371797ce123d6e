//! Structural validation of client input.

use serde::{Deserialize, Serialize};

use crate::error::{MappinError, MappinResult};
use crate::types::Location;

/// Input that can check its own shape.
pub trait Validate {
    /// Ok if the input is well formed.
    fn validate(&self) -> MappinResult<()>;
}

/// Signup payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// 2..=10 characters.
    pub username: String,
    /// Must look like an email address.
    pub email: String,
    /// At least 8 characters.
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// Message payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    /// 1..=50 characters.
    pub title: String,
    /// 1..=500 characters.
    pub text: String,
    /// Optional base64-encoded image.
    #[serde(default)]
    pub image: Option<String>,
    /// Latitude of the post.
    pub latitude: f64,
    /// Longitude of the post.
    pub longitude: f64,
}

impl NewMessage {
    /// Where the message is being posted.
    pub fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Check that `value` has between `min` and `max` characters.
pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> MappinResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(MappinError::validation(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}

/// Minimal email shape check: one `@`, non-empty local part, dotted domain.
pub fn check_email(email: &str) -> MappinResult<()> {
    let invalid = || MappinError::validation("email is not a valid address");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !tld.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

/// Username length bounds.
pub fn check_username(username: &str) -> MappinResult<()> {
    check_length("username", username, 2, 10)
}

impl Validate for NewAccount {
    fn validate(&self) -> MappinResult<()> {
        check_username(&self.username)?;
        check_email(&self.email)?;
        check_length("password", &self.password, 8, usize::MAX)
    }
}

impl Validate for Credentials {
    fn validate(&self) -> MappinResult<()> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(MappinError::validation("password is required"));
        }
        Ok(())
    }
}

impl Validate for NewMessage {
    fn validate(&self) -> MappinResult<()> {
        check_length("title", &self.title, 1, 50)?;
        check_length("text", &self.text, 1, 500)?;
        if let Some(image) = &self.image {
            if image.is_empty() {
                return Err(MappinError::validation("image must not be empty"));
            }
        }
        self.location().validate()
    }
}
