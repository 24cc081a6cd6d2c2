mod auth;
mod config;
mod errors;
mod extraction;
mod identity;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod sync;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::jwt::SessionSigner;
use crate::auth::linkedin::LinkedInOAuth;
use crate::config::Config;
use crate::extraction::extractor::CvExtractor;
use crate::identity::{HttpIdentityProvider, IdentityBridge};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::client::CanisterClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hirechain API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM-backed CV extractor
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    let extractor = Arc::new(CvExtractor::new(Arc::new(llm)));
    info!("CV extractor initialized (model: {})", llm_client::MODEL);

    // Initialize profile store client
    let store = Arc::new(CanisterClient::new(
        config.canister_host.clone(),
        config.canister_id.clone(),
    ));
    info!(
        "Profile store client initialized (canister: {})",
        config.canister_id
    );

    // Initialize identity bridge
    let provider = Arc::new(HttpIdentityProvider::new(
        config.identity_provider_url.clone(),
    ));
    let bridge = Arc::new(IdentityBridge::new(provider));
    info!("Identity bridge initialized");

    // OAuth relay and session signing
    let oauth = Arc::new(LinkedInOAuth::new(
        config.linkedin_client_id.clone(),
        config.linkedin_client_secret.clone(),
        config.linkedin_redirect_uri.clone(),
    ));
    let sessions = SessionSigner::new(config.session_secret.clone());

    // CORS: only the configured frontend origin, with credentials for the
    // session cookie.
    let frontend_origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .map_err(|_| anyhow::anyhow!("FRONTEND_ORIGIN is not a valid header value"))?;
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractor,
        store,
        bridge,
        oauth,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
