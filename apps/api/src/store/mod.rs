//! Profile Store Client — thin typed adapter over the external profile
//! canister. All wire-encoding quirks (tri-state booleans as empty/one-element
//! sequences, 64-bit durations) stay inside this module.

pub mod client;
pub mod wire;

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::Principal;
use crate::models::profile::{Position, ReviewField, UserProfile};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("profile store rejected call (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("user already registered")]
    AlreadyExists,

    #[error("profile not found")]
    NotFound,

    #[error("malformed profile store reply: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Operations against the external profile store. The client performs no
/// retries — retry policy, if any, belongs to the caller.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Registers a user. Fails with `AlreadyExists` if the principal is
    /// already registered; callers decide whether that is an error.
    async fn register_user(
        &self,
        principal: &Principal,
        name: &str,
        skill_level: &str,
    ) -> Result<(), StoreError>;

    /// Appends a position to the user's profile.
    async fn add_position(
        &self,
        principal: &Principal,
        position: &Position,
    ) -> Result<(), StoreError>;

    /// Reads back the user's current profile.
    async fn get_profile(&self, principal: &Principal) -> Result<UserProfile, StoreError>;

    /// All registered profiles, keyed by principal text.
    async fn list_profiles(&self) -> Result<Vec<(String, UserProfile)>, StoreError>;

    /// Sets the `verified` or `reviewed` flag on one of the target user's
    /// positions, addressed by index.
    async fn verify_position(
        &self,
        target: &Principal,
        index: u64,
        field: ReviewField,
        value: bool,
    ) -> Result<(), StoreError>;
}
