//! Long-lived signed bearer tokens.
//!
//! Tokens are a base64url JSON payload carrying the account id and expiry,
//! signed with HMAC-SHA256. They are stateless: verification re-checks the
//! signature and expiry, then the account service confirms the referenced
//! account still exists. There is no revocation list; expiry is the only
//! invalidation mechanism.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::user::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime. Tokens are deliberately long-lived; clients are
/// expected to cache them rather than re-authenticate per request.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 60;

/// Errors produced while issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Signing { message: String },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signing { message } => write!(f, "token signing failed: {message}"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Opaque signed token handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedToken(String);

impl SignedToken {
    /// The wire representation of the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SignedToken> for String {
    fn from(value: SignedToken) -> Self {
        value.0
    }
}

/// Verified token contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Account the token was issued for.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Moment the token stops being accepted.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

#[derive(Serialize, Deserialize)]
struct ClaimsPayload {
    sub: Uuid,
    exp: i64,
}

/// Issues and verifies signed bearer tokens with a shared secret.
pub struct TokenSigner {
    key: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    /// Construct a signer with an explicit token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: secret.to_vec(),
            ttl,
        }
    }

    /// Construct a signer with the default long-lived lifetime.
    #[must_use]
    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    /// Issue a token for the given account, valid from `now`.
    pub fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<SignedToken, TokenError> {
        let payload = ClaimsPayload {
            sub: *user_id.as_uuid(),
            exp: (now + self.ttl).timestamp(),
        };
        let body = serde_json::to_vec(&payload).map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })?;
        let body_b64 = URL_SAFE_NO_PAD.encode(body);
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })?;
        mac.update(body_b64.as_bytes());
        let sig_b64 = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(SignedToken(format!("{body_b64}.{sig_b64}")))
    }

    /// Verify a raw token string against the signing key and `now`.
    ///
    /// Returns `None` for any malformed, tampered, or expired token; the
    /// caller never learns which check failed.
    #[must_use]
    pub fn verify(&self, raw: &str, now: DateTime<Utc>) -> Option<TokenClaims> {
        let (body_b64, sig_b64) = raw.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(sig_b64).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.key).ok()?;
        mac.update(body_b64.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let body = URL_SAFE_NO_PAD.decode(body_b64).ok()?;
        let payload: ClaimsPayload = serde_json::from_slice(&body).ok()?;
        let expires_at = DateTime::<Utc>::from_timestamp(payload.exp, 0)?;
        if expires_at <= now {
            return None;
        }
        Some(TokenClaims {
            user_id: UserId::from(payload.sub),
            expires_at,
        })
    }
}
