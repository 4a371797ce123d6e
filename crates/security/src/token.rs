//! Signed bearer tokens
//!
//! Compact `header.payload.signature` strings: each part base64url without
//! padding, the signature an HMAC-SHA256 over `header.payload`.
//!
//! Tokens are opaque to clients. The payload carries the store handle the
//! session manager checks for revocation, the owning identity, the expiry and
//! a `kind` claim, so an access token can never pass as a refresh token even
//! if both keys were configured identically.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use mappin_core::{MappinError, TokenKind, Uid};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Fixed header, pre-encoded once per signature.
const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Which token a set of claims belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    /// Access token
    Access,
    /// Refresh token
    Refresh,
}

impl ClaimKind {
    fn token_kind(self) -> TokenKind {
        match self {
            ClaimKind::Access => TokenKind::Access,
            ClaimKind::Refresh => TokenKind::Refresh,
        }
    }
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Access or refresh
    pub kind: ClaimKind,
    /// Store handle (AccessID or RefreshID)
    pub handle: String,
    /// Handle of the other half of the pair, carried by refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    /// Owning identity
    pub uid: Uid,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// Why a token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not three base64url parts, or the payload is not valid claims.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the key.
    #[error("signature mismatch")]
    BadSignature,
    /// The embedded expiry has passed.
    #[error("token expired")]
    Expired,
    /// Valid token of the other kind.
    #[error("unexpected token kind")]
    WrongKind,
}

impl TokenError {
    /// Convert into the workspace error, tagged with the credential kind.
    ///
    /// Expiry stays distinguishable; everything else becomes `InvalidToken`.
    pub fn into_error(self, token: TokenKind) -> MappinError {
        match self {
            TokenError::Expired => MappinError::expired(token),
            other => MappinError::invalid_token(token, other.to_string()),
        }
    }
}

/// Signs and verifies tokens of one kind with one key.
#[derive(Clone)]
pub struct TokenCodec {
    kind: ClaimKind,
    key: Vec<u8>,
}

impl TokenCodec {
    /// Create a codec for `kind` tokens signed with `secret`.
    pub fn new(kind: ClaimKind, secret: &str) -> Self {
        Self {
            kind,
            key: secret.as_bytes().to_vec(),
        }
    }

    /// The kind of token this codec produces.
    pub fn kind(&self) -> ClaimKind {
        self.kind
    }

    fn mac(&self) -> Result<HmacSha256, MappinError> {
        // HMAC accepts keys of any length; this only fails on an API misuse
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| MappinError::invalid_token(self.kind.token_kind(), e.to_string()))
    }

    /// Sign `claims` into a compact token string.
    pub fn sign(&self, claims: &Claims) -> Result<String, MappinError> {
        let header = URL_SAFE_NO_PAD.encode(HEADER);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);
        let signing_input = format!("{}.{}", header, payload);

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Verify signature, kind and expiry against `now` (unix seconds).
    pub fn verify(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s)) if parts.next().is_none() => (h, p, s),
            _ => return Err(TokenError::Malformed),
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac().map_err(|_| TokenError::Malformed)?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let header = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenError::Malformed)?;
        if header != HEADER.as_bytes() {
            return Err(TokenError::Malformed);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.kind != self.kind {
            return Err(TokenError::WrongKind);
        }
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("kind", &self.kind)
            .field("key", &"<redacted>")
            .finish()
    }
}
