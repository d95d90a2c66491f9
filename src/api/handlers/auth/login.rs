//! Login, challenge gate first, then credentials, lockout, and token
//! issuance.

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::{Extension, Json};
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};

use super::error::AuthError;
use super::state::AuthState;
use super::types::{LoginData, LoginRequest, LoginResponse, MessageResponse, UserInfo};
use super::utils::{extract_client_ip, require_body};
use crate::account::guard::{self, LockState};
use crate::account::store as accounts;
use crate::challenge::store::{self as challenges, ChallengeOutcome};
use crate::password;
use crate::session::store::{self as sessions, NewSession};

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Unknown challenge token", body = MessageResponse),
        (status = 401, description = "Failed challenge or bad credentials", body = MessageResponse),
        (status = 403, description = "Email or phone not verified yet", body = MessageResponse),
        (status = 423, description = "Account locked", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    headers: HeaderMap,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AuthError> {
    let request = require_body(payload)?;

    // The challenge is judged before credentials are even looked at, so a
    // failed password attempt always costs a fresh challenge.
    match challenges::validate(&pool, request.challenge_token.trim(), &request.challenge_answer)
        .await?
    {
        ChallengeOutcome::Passed => {}
        ChallengeOutcome::Unknown => {
            return Err(AuthError::InvalidProof("Invalid challenge token"));
        }
        ChallengeOutcome::Stale => {
            return Err(AuthError::Unauthorized("Challenge expired or exceeded attempts"));
        }
        ChallengeOutcome::Wrong => {
            return Err(AuthError::Unauthorized("Human verification failed"));
        }
    }

    let identifier = request.username_or_email.trim();

    let account = accounts::resolve_identifier(&pool, identifier)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    match guard::lock_state(account.locked_at, state.policy().lockout_window(), Utc::now()) {
        LockState::Clear => {}
        LockState::Locked { .. } => return Err(AuthError::AccountLocked),
        LockState::Lapsed => accounts::reset_failed_logins(&pool, account.id).await?,
    }

    if !password::verify(&request.password, &account.password_hash) {
        let failures =
            accounts::record_failed_login(&pool, account.id, state.policy().lockout_threshold())
                .await?;

        warn!(account_id = %account.id, failures, "failed login attempt");

        return Err(AuthError::InvalidCredentials);
    }

    if !account.fully_verified() {
        return Err(AuthError::NotVerified);
    }

    accounts::reset_failed_logins(&pool, account.id).await?;

    let pair = state
        .signer()
        .issue(account.id, &account.username, &account.roles)?;

    let device_info = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    sessions::create(
        &pool,
        &NewSession {
            account_id: account.id,
            access_token: &pair.access,
            refresh_token: Some(&pair.refresh),
            device_info: device_info.as_deref(),
            ip_address: extract_client_ip(&headers).as_deref(),
            ttl_seconds: state.policy().access_ttl_seconds(),
        },
    )
    .await;

    info!(account_id = %account.id, "login succeeded");

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        data: LoginData {
            access_token: pair.access,
            refresh_token: pair.refresh,
            expires_in: pair.expires_in,
            user: UserInfo::from(&account),
        },
    }))
}
