//! Axum route handlers for profile synchronization and verifier review.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::session::SessionPrincipal;
use crate::errors::AppError;
use crate::extraction::extractor::WorkExperience;
use crate::identity::Principal;
use crate::models::profile::{ReviewField, UserProfile};
use crate::state::AppState;
use crate::sync::workflow::{sync_profile, SyncReport};

/// Registration default when the caller supplies no skill level.
const DEFAULT_SKILL_LEVEL: &str = "Professional";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub work_experiences: Vec<WorkExperience>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skill_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub data: SyncReport,
}

/// POST /api/v1/profile/sync
///
/// Runs the synchronization workflow for the authenticated principal.
/// Per-experience failures come back in `data.failedExperiences`; the
/// profile reflects everything that did persist.
pub async fn handle_sync(
    State(state): State<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    Json(request): Json<SyncRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    let name = request.name.as_deref().unwrap_or(principal.as_str());
    let skill_level = request.skill_level.as_deref().unwrap_or(DEFAULT_SKILL_LEVEL);

    let report = sync_profile(
        state.store.as_ref(),
        &principal,
        name,
        skill_level,
        &request.work_experiences,
    )
    .await?;

    Ok(Json(SyncResponse {
        success: true,
        data: report,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub data: UserProfile,
}

/// GET /api/v1/profile
///
/// Reads back the authenticated caller's profile.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.store.get_profile(&principal).await?;
    Ok(Json(ProfileResponse {
        success: true,
        data: profile,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProfileListEntry {
    pub principal: String,
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub success: bool,
    pub data: Vec<ProfileListEntry>,
}

/// GET /api/v1/profiles
///
/// All registered profiles, for the verifier dashboard.
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    SessionPrincipal(_principal): SessionPrincipal,
) -> Result<Json<ProfileListResponse>, AppError> {
    let profiles = state.store.list_profiles().await?;
    Ok(Json(ProfileListResponse {
        success: true,
        data: profiles
            .into_iter()
            .map(|(principal, profile)| ProfileListEntry { principal, profile })
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPositionRequest {
    pub principal: String,
    pub index: u64,
    pub field: ReviewField,
    pub value: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifyPositionResponse {
    pub success: bool,
}

/// POST /api/v1/positions/verify
///
/// A verifier sets the `verified` or `reviewed` flag on one position of the
/// target user's profile.
pub async fn handle_verify_position(
    State(state): State<AppState>,
    SessionPrincipal(_verifier): SessionPrincipal,
    Json(request): Json<VerifyPositionRequest>,
) -> Result<Json<VerifyPositionResponse>, AppError> {
    let target: Principal = request
        .principal
        .parse()
        .map_err(|_| AppError::InvalidInput("Invalid principal format".to_string()))?;

    state
        .store
        .verify_position(&target, request.index, request.field, request.value)
        .await?;

    Ok(Json(VerifyPositionResponse { success: true }))
}
