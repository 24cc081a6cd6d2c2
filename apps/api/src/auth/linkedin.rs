//! LinkedIn OAuth relay (OpenID Connect).
//!
//! Authorization-code flow: redirect to LinkedIn, exchange the callback code
//! for an access token, fetch the OpenID userinfo. Only `sub` and `email`
//! leave this module — exactly what the identity bridge needs.

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const AUTHORIZE_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";
const SCOPE: &str = "openid profile email";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OAuth exchange rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// The external identity this whole pipeline keys on.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedInUser {
    /// Stable LinkedIn subject id.
    pub sub: String,
    /// Verified email address.
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct LinkedInOAuth {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl LinkedInOAuth {
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// The LinkedIn authorize URL the browser is redirected to.
    pub fn authorize_url(&self) -> String {
        Url::parse_with_params(
            AUTHORIZE_URL,
            [
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPE),
            ],
        )
        .expect("static authorize URL is valid")
        .to_string()
    }

    /// Exchanges a callback code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        debug!("exchanging LinkedIn authorization code");
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let token: AccessTokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Fetches the OpenID userinfo for an access token.
    pub async fn fetch_user(&self, access_token: &str) -> Result<LinkedInUser, OAuthError> {
        let response = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}
