//! One-time validation codes.
//!
//! A code maps to the identity it confirms and lives in its own namespace of
//! the ephemeral store. Redemption deletes the code; when two callers race on
//! the same code only the one whose delete removed it succeeds.

use std::sync::Arc;
use std::time::Duration;

use mappin_core::traits::EphemeralStore;
use mappin_core::{CodesConfig, MappinError, MappinResult, TokenKind, Uid};
use uuid::Uuid;

/// Issues and redeems validation codes.
pub struct ValidationCodes {
    store: Arc<dyn EphemeralStore>,
    ttl: Duration,
}

impl ValidationCodes {
    /// Create a code issuer over the code namespace `store`.
    pub fn new(store: Arc<dyn EphemeralStore>, config: &CodesConfig) -> Self {
        Self {
            store,
            ttl: config.ttl(),
        }
    }

    /// Generate and store a fresh code for `uid`.
    pub fn issue(&self, uid: &Uid) -> MappinResult<String> {
        let code = format!("v{}", Uuid::new_v4().simple());
        self.store.set(&code, uid.as_str(), Some(self.ttl))?;
        tracing::debug!(uid = %uid, "validation code issued");
        Ok(code)
    }

    /// Consume a code and return the identity it confirms.
    pub fn redeem(&self, code: &str) -> MappinResult<Uid> {
        let uid = self
            .store
            .get(code)?
            .ok_or_else(|| MappinError::expired(TokenKind::ValidationCode))?;
        if self.store.delete(&[code])? == 0 {
            return Err(MappinError::expired(TokenKind::ValidationCode));
        }
        Ok(Uid::from(uid))
    }
}

impl std::fmt::Debug for ValidationCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationCodes")
            .field("ttl", &self.ttl)
            .finish()
    }
}
