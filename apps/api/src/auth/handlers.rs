//! Axum route handlers for authentication.

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::identity::Principal;
use crate::state::AppState;

use super::session::session_cookie;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub principal: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub token: String,
    pub principal: String,
}

/// POST /api/v1/auth/verify
///
/// Validates a principal and establishes a session: signed token in an
/// HTTP-only cookie, echoed in the body for non-browser clients.
pub async fn handle_verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let principal = request
        .principal
        .ok_or_else(|| AppError::InvalidInput("Missing principal".to_string()))?;

    let principal: Principal = principal
        .parse()
        .map_err(|_| AppError::InvalidInput("Invalid principal format".to_string()))?;

    let token = state.sessions.issue(principal.as_str())?;
    let cookie = session_cookie(&token);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(VerifyResponse {
            success: true,
            principal: principal.to_string(),
            token,
        }),
    ))
}

/// GET /auth/linkedin
///
/// Starts the OAuth flow by redirecting the browser to LinkedIn.
pub async fn handle_linkedin_start(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.oauth.authorize_url())
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub principal: String,
    pub token: String,
}

/// GET /auth/linkedin/callback
///
/// Completes the login: code → access token → userinfo, then the identity
/// bridge (derivation + provider handshake), then a session cookie for the
/// resolved principal.
pub async fn handle_linkedin_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<impl IntoResponse, AppError> {
    let code = query
        .code
        .ok_or_else(|| AppError::InvalidInput("No code provided".to_string()))?;

    let access_token = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(|e| AppError::AuthHandshake(e.to_string()))?;
    let user = state
        .oauth
        .fetch_user(&access_token)
        .await
        .map_err(|e| AppError::AuthHandshake(e.to_string()))?;

    let principal = state.bridge.login(&user.sub, &user.email).await?;

    let token = state.sessions.issue(principal.as_str())?;
    let cookie = session_cookie(&token);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            success: true,
            principal: principal.to_string(),
            token,
        }),
    ))
}
