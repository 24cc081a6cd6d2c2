use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Network host of the profile canister gateway.
    pub canister_host: String,
    /// Identifier of the user-profile canister.
    pub canister_id: String,
    /// Base URL of the identity provider for the derivation handshake.
    pub identity_provider_url: String,
    pub linkedin_client_id: String,
    pub linkedin_client_secret: String,
    pub linkedin_redirect_uri: String,
    /// HMAC secret for session tokens.
    pub session_secret: String,
    /// Frontend origin for the CORS allow-list.
    pub frontend_origin: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            canister_host: require_env("PROFILE_CANISTER_HOST")?,
            canister_id: require_env("PROFILE_CANISTER_ID")?,
            identity_provider_url: require_env("IDENTITY_PROVIDER_URL")?,
            linkedin_client_id: require_env("LINKEDIN_CLIENT_ID")?,
            linkedin_client_secret: require_env("LINKEDIN_CLIENT_SECRET")?,
            linkedin_redirect_uri: require_env("LINKEDIN_REDIRECT_URI")?,
            session_secret: require_env("SESSION_SECRET")?,
            frontend_origin: std::env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
