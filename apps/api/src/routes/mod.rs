pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::extraction::handlers as cv_handlers;
use crate::state::AppState;
use crate::sync::handlers as profile_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV extraction
        .route("/api/v1/cv/parse", post(cv_handlers::handle_parse_cv))
        .route("/api/v1/cv/upload", post(cv_handlers::handle_upload_cv))
        // Authentication
        .route("/api/v1/auth/verify", post(auth_handlers::handle_verify))
        .route("/auth/linkedin", get(auth_handlers::handle_linkedin_start))
        .route(
            "/auth/linkedin/callback",
            get(auth_handlers::handle_linkedin_callback),
        )
        // Profiles
        .route("/api/v1/profile/sync", post(profile_handlers::handle_sync))
        .route("/api/v1/profile", get(profile_handlers::handle_get_profile))
        .route(
            "/api/v1/profiles",
            get(profile_handlers::handle_list_profiles),
        )
        .route(
            "/api/v1/positions/verify",
            post(profile_handlers::handle_verify_position),
        )
        .with_state(state)
}
