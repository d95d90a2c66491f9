//! Session introspection and teardown.
//!
//! Logout never fails the caller. A missing, malformed, or already
//! revoked token still gets the success message, the server just logs
//! what it could not do.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::{Extension, Json};
use sqlx::PgPool;
use tracing::{error, info, warn};

use super::error::AuthError;
use super::state::AuthState;
use super::types::{MessageResponse, SessionResponse, UserInfo};
use super::utils::extract_bearer_token;
use crate::account::store as accounts;
use crate::session::store as sessions;

#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Session is live, account attached", body = SessionResponse),
        (status = 401, description = "Missing, invalid, or revoked token", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn introspect(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>, AuthError> {
    let token =
        extract_bearer_token(&headers).ok_or(AuthError::Unauthorized("Missing bearer token"))?;

    let claims = state
        .signer()
        .verify(token)
        .map_err(|_| AuthError::Unauthorized("Invalid or expired token"))?;

    // Signature checks out, now make sure the session was not revoked.
    if !sessions::is_valid(&pool, token).await? {
        return Err(AuthError::Unauthorized("Session is no longer active"));
    }

    let account = accounts::find_by_username(&pool, &claims.username)
        .await?
        .ok_or(AuthError::Unauthorized("Session is no longer active"))?;

    Ok(Json(SessionResponse {
        success: true,
        message: "Session is valid".to_string(),
        data: UserInfo::from(&account),
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Session revoked, or nothing to revoke", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn logout(
    Extension(pool): Extension<PgPool>,
    headers: HeaderMap,
) -> Json<MessageResponse> {
    if let Some(token) = extract_bearer_token(&headers) {
        if let Err(err) = sessions::invalidate(&pool, token).await {
            error!("failed to invalidate session: {err:#}");
        }
    }

    Json(MessageResponse::ok("Logged out successfully"))
}

#[utoipa::path(
    post,
    path = "/auth/logout-all",
    responses(
        (status = 200, description = "Every session for the account revoked", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn logout_all(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
) -> Json<MessageResponse> {
    if let Some(token) = extract_bearer_token(&headers) {
        match state.signer().verify(token) {
            Ok(claims) => match sessions::invalidate_all(&pool, claims.user_id).await {
                Ok(revoked) => {
                    info!(account_id = %claims.user_id, revoked, "revoked all sessions");
                }
                Err(err) => error!("failed to revoke sessions: {err:#}"),
            },
            Err(err) => warn!("logout-all with an unusable token: {err:#}"),
        }
    }

    Json(MessageResponse::ok("Logged out from all devices successfully"))
}
