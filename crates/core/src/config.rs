//! Service configuration.
//!
//! Built once at startup and handed to each component; nothing reads
//! configuration from the process environment at call time.
//!
//! ```toml
//! [session]
//! access_secret = "..."
//! refresh_secret = "..."
//! access_ttl_secs = 3600
//!
//! [store]
//! op_timeout_ms = 5000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MappinError, MappinResult};

/// Signing keys and lifetimes of session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// HMAC key for access tokens.
    pub access_secret: String,
    /// HMAC key for refresh tokens.
    pub refresh_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: u64,
}

impl SessionConfig {
    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        Duration::from_secs(self.access_ttl_secs)
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_ttl_secs: 60 * 60,
            refresh_ttl_secs: 30 * 24 * 60 * 60,
        }
    }
}

/// One-time validation codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodesConfig {
    /// Code lifetime in seconds.
    pub ttl_secs: u64,
    /// Link prefix mailed to new accounts; the code is appended.
    pub validation_url: String,
}

impl CodesConfig {
    /// Code lifetime.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
            validation_url: "https://mappin.hadrons.xyz/users/validate?code=".to_string(),
        }
    }
}

/// Store access bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on a single store call, in milliseconds.
    pub op_timeout_ms: u64,
}

impl StoreConfig {
    /// Upper bound on a single store call.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            op_timeout_ms: 5_000,
        }
    }
}

/// Engagement ledger tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Compare-and-set attempts before a toggle gives up with a conflict.
    pub max_cas_attempts: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_cas_attempts: 8,
        }
    }
}

/// Feed query parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Search radius in metres.
    pub radius_m: f64,
    /// Maximum messages returned per query.
    pub limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            radius_m: 1_000_000.0,
            limit: 500,
        }
    }
}

/// Account lifecycle settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    /// Minimum seconds between two username changes.
    pub username_change_cooldown_secs: i64,
    /// From address of outbound mail.
    pub sender: String,
    /// bcrypt cost factor for password digests.
    pub password_cost: u32,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            username_change_cooldown_secs: 7 * 24 * 60 * 60,
            sender: "Mappin App <mappin@hadrons.xyz>".to_string(),
            password_cost: 12,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Session tokens.
    pub session: SessionConfig,
    /// Validation codes.
    pub codes: CodesConfig,
    /// Store bounds.
    pub store: StoreConfig,
    /// Engagement ledger.
    pub ledger: LedgerConfig,
    /// Feed queries.
    pub feed: FeedConfig,
    /// Accounts.
    pub accounts: AccountsConfig,
}

impl ServiceConfig {
    /// Default configuration with the given signing secrets.
    pub fn with_secrets(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        let mut cfg = Self::default();
        cfg.session.access_secret = access_secret.into();
        cfg.session.refresh_secret = refresh_secret.into();
        cfg
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> MappinResult<Self> {
        let cfg: ServiceConfig = toml::from_str(raw)
            .map_err(|e| MappinError::validation(format!("config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> MappinResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MappinError::validation(format!("config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> MappinResult<()> {
        let s = &self.session;
        if s.access_secret.is_empty() || s.refresh_secret.is_empty() {
            return Err(MappinError::validation("session secrets must not be empty"));
        }
        if s.access_ttl_secs == 0 || s.refresh_ttl_secs == 0 {
            return Err(MappinError::validation("token lifetimes must be positive"));
        }
        if s.access_ttl_secs >= s.refresh_ttl_secs {
            return Err(MappinError::validation(
                "access token lifetime must be shorter than refresh token lifetime",
            ));
        }
        if self.codes.ttl_secs == 0 {
            return Err(MappinError::validation("validation code lifetime must be positive"));
        }
        if self.store.op_timeout_ms == 0 {
            return Err(MappinError::validation("store timeout must be positive"));
        }
        if !(4..=31).contains(&self.accounts.password_cost) {
            return Err(MappinError::validation("password cost must be between 4 and 31"));
        }
        if self.ledger.max_cas_attempts == 0 {
            return Err(MappinError::validation("ledger needs at least one CAS attempt"));
        }
        if !(self.feed.radius_m > 0.0) || self.feed.limit == 0 {
            return Err(MappinError::validation("feed radius and limit must be positive"));
        }
        Ok(())
    }
}
