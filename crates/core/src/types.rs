//! Identifiers and domain records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{MappinError, MappinResult};

/// Mean earth radius in metres, used by distance calculations.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque unique identity handle.
///
/// Generated at signup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    /// Wrap an existing identity string.
    pub fn new(raw: impl Into<String>) -> Self {
        Uid(raw.into())
    }

    /// Generate a fresh identity (`u` followed by a random UUID).
    pub fn generate() -> Self {
        Uid(format!("u{}", Uuid::new_v4().simple()))
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Uid(s.to_string())
    }
}

impl From<String> for Uid {
    fn from(s: String) -> Self {
        Uid(s)
    }
}

/// Identifier of an evaluable item (a posted message).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing item id.
    pub fn new(raw: impl Into<String>) -> Self {
        ItemId(raw.into())
    }

    /// Generate a fresh item id (`m` followed by a random UUID).
    pub fn generate() -> Self {
        ItemId(format!("m{}", Uuid::new_v4().simple()))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

// =============================================================================
// Polarity
// =============================================================================

/// Direction of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Upvote, contributes +1 to the counter.
    #[serde(rename = "upvote")]
    Up,
    /// Downvote, contributes -1 to the counter.
    #[serde(rename = "downvote")]
    Down,
}

impl Polarity {
    /// Contribution of one evaluation with this polarity to the counter.
    pub fn weight(self) -> i64 {
        match self {
            Polarity::Up => 1,
            Polarity::Down => -1,
        }
    }

    /// Wire name of this polarity.
    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Up => "upvote",
            Polarity::Down => "downvote",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = MappinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" | "up" => Ok(Polarity::Up),
            "downvote" | "down" => Ok(Polarity::Down),
            other => Err(MappinError::validation(format!(
                "Invalid evaluation '{}'. Must be 'upvote' or 'downvote'.",
                other
            ))),
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// A point on earth in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude, -90..=90
    pub latitude: f64,
    /// Longitude, -180..=180
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting non-earth coordinates.
    pub fn new(latitude: f64, longitude: f64) -> MappinResult<Self> {
        let loc = Location {
            latitude,
            longitude,
        };
        loc.validate()?;
        Ok(loc)
    }

    /// Check that both coordinates are finite and in range.
    pub fn validate(&self) -> MappinResult<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(MappinError::validation(
                "Coordinates are invalid. Please return to using earth coordinates.",
            ))
        }
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_m(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

// =============================================================================
// Feed query
// =============================================================================

/// Ordering of feed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrder {
    /// Newest first.
    New,
    /// Highest counter first.
    #[default]
    Top,
}

impl FeedOrder {
    /// Parse a client-supplied order; anything but `new` means `top`.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("new") => FeedOrder::New,
            _ => FeedOrder::Top,
        }
    }
}

/// Geospatial "near" query consumed from the message store.
#[derive(Debug, Clone, PartialEq)]
pub struct NearQuery {
    /// Centre of the search.
    pub center: Location,
    /// Maximum distance from the centre in metres.
    pub max_distance_m: f64,
    /// Restrict results to these authors (None = everyone).
    pub authors: Option<Vec<Uid>>,
    /// Result ordering.
    pub order: FeedOrder,
    /// Maximum number of results.
    pub limit: usize,
}

// =============================================================================
// Records
// =============================================================================

/// A stored account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Identity of the account.
    pub uid: Uid,
    /// Display name.
    pub username: String,
    /// Unique secondary key.
    pub email: String,
    /// Password digest produced by the credential hasher.
    #[serde(skip_serializing)]
    pub password_digest: String,
    /// Profile image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Last location the user reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Unix seconds of creation.
    pub created_at: i64,
    /// Unix seconds of the last login.
    pub last_access: i64,
    /// Unix seconds of the last username change.
    pub last_changed_name: i64,
    /// Whether the email address has been confirmed.
    pub validated: bool,
}

/// A posted message; the item evaluations refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Item id.
    pub mid: ItemId,
    /// Author.
    pub uid: Uid,
    /// Title, 1..=50 chars.
    pub title: String,
    /// Body, 1..=500 chars.
    pub text: String,
    /// Uploaded image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unix seconds of posting.
    pub date: i64,
    /// Where the message was posted.
    pub location: Location,
    /// Counter: ups minus downs. Written only by the engagement ledger.
    pub eval_value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = Uid::generate();
        let b = Uid::generate();
        assert!(a.as_str().starts_with('u'));
        assert_ne!(a, b);
        assert!(ItemId::generate().as_str().starts_with('m'));
    }

    #[test]
    fn test_polarity_parse_and_weight() {
        assert_eq!("upvote".parse::<Polarity>().unwrap(), Polarity::Up);
        assert_eq!("down".parse::<Polarity>().unwrap(), Polarity::Down);
        assert!("sideways".parse::<Polarity>().is_err());
        assert_eq!(Polarity::Up.weight(), 1);
        assert_eq!(Polarity::Down.weight(), -1);
    }

    #[test]
    fn test_polarity_serde_uses_wire_names() {
        let json = serde_json::to_string(&Polarity::Down).unwrap();
        assert_eq!(json, "\"downvote\"");
    }

    #[test]
    fn test_location_rejects_non_earth_coordinates() {
        assert!(Location::new(38.7, -9.1).is_ok());
        assert!(Location::new(90.0, 180.0).is_ok());
        assert!(Location::new(90.1, 0.0).is_err());
        assert!(Location::new(0.0, -180.5).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_is_symmetric_and_plausible() {
        let lisbon = Location::new(38.7223, -9.1393).unwrap();
        let porto = Location::new(41.1579, -8.6291).unwrap();
        let d1 = lisbon.distance_m(&porto);
        let d2 = porto.distance_m(&lisbon);
        assert!((d1 - d2).abs() < 1e-6);
        // Roughly 274 km apart
        assert!(d1 > 270_000.0 && d1 < 280_000.0);
        assert_eq!(lisbon.distance_m(&lisbon), 0.0);
    }

    #[test]
    fn test_feed_order_parse() {
        assert_eq!(FeedOrder::parse(Some("new")), FeedOrder::New);
        assert_eq!(FeedOrder::parse(Some("top")), FeedOrder::Top);
        assert_eq!(FeedOrder::parse(None), FeedOrder::Top);
    }
}
