//! Password digests.
//!
//! Digests are standard bcrypt strings (`$2b$<cost>$<salt+hash>`), so the
//! cost a digest was made with travels inside it.

use mappin_core::traits::CredentialHasher;
use mappin_core::{MappinError, MappinResult};

/// Work factor used when none is configured.
pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

/// bcrypt-backed [`CredentialHasher`].
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Hasher with [`DEFAULT_COST`].
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Hasher with a custom work factor, clamped to bcrypt's 4..=31.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    /// The work factor new digests are made with.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, secret: &str) -> MappinResult<String> {
        bcrypt::hash(secret, self.cost).map_err(|e| MappinError::storage(format!("hasher: {}", e)))
    }

    fn verify(&self, secret: &str, digest: &str) -> bool {
        match bcrypt::verify(secret, digest) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable password digest");
                false
            }
        }
    }
}
