//! Session cookie plumbing: the `Set-Cookie` builder and the extractor that
//! authenticates handlers.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::auth::jwt::SESSION_TTL_SECS;
use crate::errors::AppError;
use crate::identity::Principal;
use crate::state::AppState;

/// Cookie name carrying the session token.
pub const SESSION_COOKIE: &str = "auth_token";

/// Builds the session `Set-Cookie` value: HTTP-only, same-site strict,
/// expiring with the token.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={SESSION_TTL_SECS}")
}

/// The authenticated caller's principal, extracted from the session cookie
/// or an `Authorization: Bearer` header.
///
/// Missing credentials are `Unauthorized` (401); a bad or expired token is
/// `Forbidden` (403).
pub struct SessionPrincipal(pub Principal);

fn token_from_cookie_header(header_value: &str) -> Option<&str> {
    header_value.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

fn token_from_parts(parts: &Parts) -> Option<&str> {
    let cookie_token = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header);

    cookie_token.or_else(|| {
        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    })
}

#[axum::async_trait]
impl FromRequestParts<AppState> for SessionPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts).ok_or(AppError::Unauthorized)?;
        let claims = state.sessions.verify(token)?;
        let principal = claims.principal.parse().map_err(|_| AppError::Forbidden)?;
        Ok(SessionPrincipal(principal))
    }
}
