//! Identity bridge — maps external users onto blockchain principals.
//!
//! Lookup order: cached mapping first, fresh derivation plus provider
//! handshake second. The cache is append-only and keyed by external id;
//! last-write-wins races are harmless because the value is a pure function
//! of the inputs.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use ed25519_dalek::Signer;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::identity::derivation::{derive_identity, DerivedIdentity, Principal};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("identity provider transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("identity provider rejected the handshake (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The session-establishment seam. The derived keypair is presented to the
/// external identity provider; only after this handshake is the principal
/// usable for writes.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn establish_session(&self, identity: &DerivedIdentity) -> Result<(), ProviderError>;
}

/// Challenge/response handshake over HTTP: fetch a challenge, sign it with
/// the derived key, post the signature back.
pub struct HttpIdentityProvider {
    http: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    challenge: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn establish_session(&self, identity: &DerivedIdentity) -> Result<(), ProviderError> {
        let challenge_url = format!("{}/api/v1/challenge", self.base_url);
        let response = self.http.get(&challenge_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let ChallengeResponse { challenge } = response.json().await?;

        let signature = identity.signing_key.sign(challenge.as_bytes());

        let session_url = format!("{}/api/v1/session", self.base_url);
        let response = self
            .http
            .post(&session_url)
            .json(&json!({
                "principal": identity.principal.as_str(),
                "publicKey": hex::encode(identity.verifying_key().to_bytes()),
                "challenge": challenge,
                "signature": hex::encode(signature.to_bytes()),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        debug!(principal = %identity.principal, "identity provider session established");
        Ok(())
    }
}

/// The bridge itself: derivation + handshake + mapping cache.
pub struct IdentityBridge {
    provider: Arc<dyn IdentityProvider>,
    mappings: DashMap<String, Principal>,
}

impl IdentityBridge {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            mappings: DashMap::new(),
        }
    }

    /// Resolves an external user to a principal.
    ///
    /// A cached mapping short-circuits both derivation and handshake. On a
    /// fresh derivation the handshake must succeed before the mapping is
    /// stored; its failure is `AuthHandshakeFailed`, never a derivation error.
    pub async fn login(&self, external_id: &str, external_email: &str) -> Result<Principal, AppError> {
        if let Some(cached) = self.mappings.get(external_id) {
            debug!(external_id, principal = %cached.value(), "principal mapping cache hit");
            return Ok(cached.value().clone());
        }

        let identity = derive_identity(external_id, external_email);

        self.provider
            .establish_session(&identity)
            .await
            .map_err(|e| AppError::AuthHandshake(e.to_string()))?;

        info!(external_id, principal = %identity.principal, "derived new principal mapping");
        self.mappings
            .insert(external_id.to_string(), identity.principal.clone());

        Ok(identity.principal)
    }
}
