//! HTTP client for the profile canister gateway.
//!
//! Every canister method is exposed by the gateway as
//! `POST {host}/canisters/{canister_id}/call/{method}` with a JSON payload
//! and a JSON reply. A duplicate registration comes back as HTTP 409 and is
//! decoded into the typed `AlreadyExists` signal; a missing profile as 404.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::identity::Principal;
use crate::models::profile::{Position, ReviewField, UserProfile};
use crate::store::wire::{WirePosition, WireProfile};
use crate::store::{ProfileStore, StoreError};

pub struct CanisterClient {
    http: Client,
    host: String,
    canister_id: String,
}

impl CanisterClient {
    pub fn new(host: String, canister_id: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            host,
            canister_id,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/canisters/{}/call/{}",
            self.host, self.canister_id, method
        )
    }

    /// One gateway round trip. No retries.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<T, StoreError> {
        debug!(method, "calling profile canister");
        let response = self
            .http
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::CONFLICT => Err(StoreError::AlreadyExists),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            s if !s.is_success() => Err(StoreError::Rejected {
                status: s.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
            _ => {
                let body = response.text().await?;
                Ok(serde_json::from_str(&body)?)
            }
        }
    }
}

#[async_trait]
impl ProfileStore for CanisterClient {
    async fn register_user(
        &self,
        principal: &Principal,
        name: &str,
        skill_level: &str,
    ) -> Result<(), StoreError> {
        self.call::<serde_json::Value>(
            "registerUser",
            json!({
                "principal": principal.as_str(),
                "name": name,
                "skillLevel": skill_level,
            }),
        )
        .await?;
        Ok(())
    }

    async fn add_position(
        &self,
        principal: &Principal,
        position: &Position,
    ) -> Result<(), StoreError> {
        self.call::<serde_json::Value>(
            "addPosition",
            json!({
                "principal": principal.as_str(),
                "position": WirePosition::from(position),
            }),
        )
        .await?;
        Ok(())
    }

    async fn get_profile(&self, principal: &Principal) -> Result<UserProfile, StoreError> {
        let wire: WireProfile = self
            .call(
                "getMyProfile",
                json!({ "principal": principal.as_str() }),
            )
            .await?;
        Ok(wire.into())
    }

    async fn list_profiles(&self) -> Result<Vec<(String, UserProfile)>, StoreError> {
        let wire: Vec<(String, WireProfile)> = self.call("getAllUsers", json!({})).await?;
        Ok(wire
            .into_iter()
            .map(|(principal, profile)| (principal, profile.into()))
            .collect())
    }

    async fn verify_position(
        &self,
        target: &Principal,
        index: u64,
        field: ReviewField,
        value: bool,
    ) -> Result<(), StoreError> {
        self.call::<serde_json::Value>(
            "verifyPosition",
            json!({
                "principal": target.as_str(),
                "index": index,
                "field": field.as_str(),
                "value": value,
            }),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_shape() {
        let client = CanisterClient::new(
            "http://127.0.0.1:8000".to_string(),
            "lqy7q-dh777-77777-aaaaq-cai".to_string(),
        );
        assert_eq!(
            client.method_url("registerUser"),
            "http://127.0.0.1:8000/canisters/lqy7q-dh777-77777-aaaaq-cai/call/registerUser"
        );
    }
}
