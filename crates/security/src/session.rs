//! Session manager
//!
//! Issues, validates, rotates and revokes access/refresh token pairs. The
//! signed tokens are self-contained, but the ephemeral store is authoritative:
//! a token whose handle is gone from the store is rejected even before its
//! embedded expiry.
//!
//! # Design
//!
//! Store layout (token namespace):
//!
//! | key | value | TTL |
//! |-----|-------|-----|
//! | AccessID | RefreshID | access TTL |
//! | RefreshID | UID | refresh TTL |
//!
//! Pair lifecycle: Active → Rotated | Revoked | Expired. Rotation consumes the
//! RefreshID with a delete, and only the caller whose delete removed the key
//! proceeds, so a refresh token is redeemable exactly once even under
//! concurrent redemption.
//!
//! # Example
//!
//! ```ignore
//! let sessions = SessionManager::new(store, &config.session)?;
//! let pair = sessions.issue(&uid)?;
//! let details = sessions.validate_access(&pair.access_token)?;
//! let fresh = sessions.rotate(&pair.refresh_token)?;
//! sessions.revoke(&fresh.access_id)?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use mappin_core::traits::EphemeralStore;
use mappin_core::{MappinError, MappinResult, SessionConfig, TokenKind, Uid};
use serde::Serialize;
use uuid::Uuid;

use crate::token::{ClaimKind, Claims, TokenCodec};

/// An issued access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,
    /// Signed refresh token
    pub refresh_token: String,
    /// Store handle of the access token
    #[serde(skip)]
    pub access_id: String,
    /// Store handle of the refresh token
    #[serde(skip)]
    pub refresh_id: String,
    /// Access expiry, unix seconds
    pub access_expires_at: i64,
    /// Refresh expiry, unix seconds
    pub refresh_expires_at: i64,
}

/// What a validated access token resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessDetails {
    /// Store handle, the argument to [`SessionManager::revoke`]
    pub access_id: String,
    /// Caller identity
    pub uid: Uid,
}

/// Issues and checks session token pairs.
pub struct SessionManager {
    store: Arc<dyn EphemeralStore>,
    access: TokenCodec,
    refresh: TokenCodec,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a session manager over the token namespace `store`.
    ///
    /// Rejects empty secrets and non-increasing TTLs.
    pub fn new(store: Arc<dyn EphemeralStore>, config: &SessionConfig) -> MappinResult<Self> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(MappinError::validation("session secrets must not be empty"));
        }
        if config.access_ttl_secs == 0 || config.access_ttl_secs >= config.refresh_ttl_secs {
            return Err(MappinError::validation(
                "access TTL must be positive and shorter than refresh TTL",
            ));
        }
        Ok(Self {
            store,
            access: TokenCodec::new(ClaimKind::Access, &config.access_secret),
            refresh: TokenCodec::new(ClaimKind::Refresh, &config.refresh_secret),
            config: config.clone(),
        })
    }

    /// Issue a fresh pair for `uid` and record both handles.
    ///
    /// Other sessions of the same identity are left untouched.
    pub fn issue(&self, uid: &Uid) -> MappinResult<TokenPair> {
        let now = Utc::now().timestamp();
        let access_id = Uuid::new_v4().to_string();
        let refresh_id = format!("{}++{}", Uuid::new_v4(), uid);
        let access_expires_at = now + self.config.access_ttl_secs as i64;
        let refresh_expires_at = now + self.config.refresh_ttl_secs as i64;

        let access_token = self.access.sign(&Claims {
            kind: ClaimKind::Access,
            handle: access_id.clone(),
            pair: None,
            uid: uid.clone(),
            exp: access_expires_at,
        })?;
        let refresh_token = self.refresh.sign(&Claims {
            kind: ClaimKind::Refresh,
            handle: refresh_id.clone(),
            pair: Some(access_id.clone()),
            uid: uid.clone(),
            exp: refresh_expires_at,
        })?;

        self.store
            .set(&access_id, &refresh_id, Some(self.config.access_ttl()))?;
        self.store
            .set(&refresh_id, uid.as_str(), Some(self.config.refresh_ttl()))?;

        tracing::info!(uid = %uid, access_id = %access_id, "session issued");
        Ok(TokenPair {
            access_token,
            refresh_token,
            access_id,
            refresh_id,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Resolve an access token to its identity.
    ///
    /// Signature and expiry are checked locally, then the handle must still
    /// be present in the store.
    pub fn validate_access(&self, token: &str) -> MappinResult<AccessDetails> {
        let claims = self
            .access
            .verify(token, Utc::now().timestamp())
            .map_err(|e| e.into_error(TokenKind::Access))?;

        if self.store.get(&claims.handle)?.is_none() {
            tracing::debug!(access_id = %claims.handle, "access handle not in store");
            return Err(MappinError::expired(TokenKind::Access));
        }
        Ok(AccessDetails {
            access_id: claims.handle,
            uid: claims.uid,
        })
    }

    /// Identity behind a live access token.
    pub fn ping(&self, token: &str) -> MappinResult<Uid> {
        self.validate_access(token).map(|details| details.uid)
    }

    /// Redeem a refresh token for a brand-new pair.
    ///
    /// The old refresh handle is consumed (and its paired access handle
    /// dropped); a handle that is already gone means the token expired, was
    /// revoked or was replayed.
    pub fn rotate(&self, refresh_token: &str) -> MappinResult<TokenPair> {
        let claims = self
            .refresh
            .verify(refresh_token, Utc::now().timestamp())
            .map_err(|e| e.into_error(TokenKind::Refresh))?;

        if self.store.delete(&[claims.handle.as_str()])? == 0 {
            tracing::debug!(uid = %claims.uid, "refresh handle already consumed");
            return Err(MappinError::expired(TokenKind::Refresh));
        }
        if let Some(access_id) = &claims.pair {
            self.store.delete(&[access_id.as_str()])?;
        }

        tracing::info!(uid = %claims.uid, "session rotated");
        self.issue(&claims.uid)
    }

    /// Delete an access handle and its paired refresh handle.
    ///
    /// Returns the number of keys actually removed: 0 when the session was
    /// already gone.
    pub fn revoke(&self, access_id: &str) -> MappinResult<u64> {
        let removed = match self.store.get(access_id)? {
            Some(refresh_id) => self.store.delete(&[access_id, refresh_id.as_str()])?,
            None => self.store.delete(&[access_id])?,
        };
        tracing::info!(access_id, removed, "session revoked");
        Ok(removed)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("access_ttl_secs", &self.config.access_ttl_secs)
            .field("refresh_ttl_secs", &self.config.refresh_ttl_secs)
            .finish()
    }
}
