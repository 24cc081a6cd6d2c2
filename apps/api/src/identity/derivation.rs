//! Deterministic identity derivation.
//!
//! The same `(external_id, email)` pair always yields the same Ed25519
//! keypair and the same principal, across process restarts and machines.
//! The stored id→principal mapping is a cache, never the source of truth.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::AppError;

/// ASCII unit separator. Cannot occur in a LinkedIn subject id or an email
/// address, so `id SEP email` is collision-free.
const SEED_SEPARATOR: u8 = 0x1F;

/// Number of digest bytes rendered into the principal text.
const PRINCIPAL_BYTES: usize = 25;
const GROUP_LEN: usize = 5;

/// The profile store's canonical identifier for an authenticated actor.
///
/// Textual form: ten dash-separated groups of five lowercase hex digits,
/// derived from the SHA-256 of the Ed25519 verifying key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.to_bytes());
        let hex = hex::encode(&digest[..PRINCIPAL_BYTES]);
        let text = hex
            .as_bytes()
            .chunks(GROUP_LEN)
            .map(|chunk| std::str::from_utf8(chunk).expect("hex output is ASCII"))
            .collect::<Vec<_>>()
            .join("-");
        Principal(text)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Principal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let groups: Vec<&str> = s.split('-').collect();
        let well_formed = groups.len() == PRINCIPAL_BYTES * 2 / GROUP_LEN
            && groups.iter().all(|g| {
                g.len() == GROUP_LEN
                    && g.bytes()
                        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            });
        if !well_formed {
            return Err(AppError::InvalidInput(
                "Invalid principal format".to_string(),
            ));
        }
        Ok(Principal(s.to_string()))
    }
}

impl From<Principal> for String {
    fn from(principal: Principal) -> Self {
        principal.0
    }
}

impl TryFrom<String> for Principal {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse().map_err(|_| "invalid principal format".into())
    }
}

/// A keypair plus principal derived from an external identity.
pub struct DerivedIdentity {
    pub principal: Principal,
    pub signing_key: SigningKey,
}

impl DerivedIdentity {
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

/// Derives the blockchain identity for an external user.
///
/// `SHA-256(id ∥ 0x1F ∥ email)` seeds the Ed25519 keypair; the principal is
/// a pure function of the two inputs.
pub fn derive_identity(external_id: &str, external_email: &str) -> DerivedIdentity {
    let mut hasher = Sha256::new();
    hasher.update(external_id.as_bytes());
    hasher.update([SEED_SEPARATOR]);
    hasher.update(external_email.as_bytes());
    let seed: [u8; 32] = hasher.finalize().into();

    let signing_key = SigningKey::from_bytes(&seed);
    let principal = Principal::from_verifying_key(&signing_key.verifying_key());

    DerivedIdentity {
        principal,
        signing_key,
    }
}
