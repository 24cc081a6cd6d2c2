use std::sync::Arc;

use crate::auth::jwt::SessionSigner;
use crate::auth::linkedin::LinkedInOAuth;
use crate::config::Config;
use crate::extraction::extractor::CvExtractor;
use crate::identity::IdentityBridge;
use crate::store::ProfileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extractor: Arc<CvExtractor>,
    /// Profile store seam. Production: the canister HTTP client.
    pub store: Arc<dyn ProfileStore>,
    pub bridge: Arc<IdentityBridge>,
    pub oauth: Arc<LinkedInOAuth>,
    pub sessions: SessionSigner,
}
