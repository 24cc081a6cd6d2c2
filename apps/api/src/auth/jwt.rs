//! Session token handling.
//!
//! Tokens are signed with HS256 and carry the caller's principal. Expiry is
//! 24 hours, matching the session cookie's Max-Age.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::AppError;

/// Session lifetime in seconds (24 hours).
pub const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Payload stored in the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal text of the authenticated actor.
    pub principal: String,
    /// Issued at (Unix timestamp).
    pub iat: u64,
    /// Expiration time (Unix timestamp).
    pub exp: u64,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
}

impl SessionSigner {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issues a token for a verified principal.
    pub fn issue(&self, principal: &str) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("system time error: {e}")))?
            .as_secs();

        let claims = Claims {
            principal: principal.to_string(),
            iat: now,
            exp: now + SESSION_TTL_SECS,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session token: {e}")))
    }

    /// Verifies a token and returns its claims. Expired or tampered tokens
    /// are `Forbidden`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::Forbidden)
    }
}
