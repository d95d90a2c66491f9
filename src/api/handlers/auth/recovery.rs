//! Password recovery, the emailed reset link and the follow-up reset.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::PgPool;
use tracing::info;

use super::error::AuthError;
use super::state::AuthState;
use super::types::{ForgotPasswordRequest, MessageResponse, ResetPasswordRequest};
use super::utils::{normalize_email, require_body};
use crate::account::store as accounts;
use crate::notify;
use crate::password;
use crate::proof::{ProofPurpose, store as proofs};
use crate::ratelimit::{RateLimitAction, RateLimitDecision};

#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link dispatched", body = MessageResponse),
        (status = 404, description = "No account for that email", body = MessageResponse),
        (status = 429, description = "Reset quota exhausted", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn forgot_password(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;
    let email = normalize_email(&request.email);

    // Counted before the account lookup so misses burn quota too.
    let decision = state
        .rate_limiter()
        .check(RateLimitAction::ForgotPassword, &email)
        .await?;

    if matches!(decision, RateLimitDecision::Limited) {
        return Err(AuthError::RateLimited);
    }

    let account = accounts::find_by_email(&pool, &email)
        .await?
        .ok_or(AuthError::NotFound("User not found with this email"))?;

    let token = proofs::issue(
        &pool,
        account.id,
        ProofPurpose::PasswordReset,
        &account.email,
        state.policy().link_ttl_seconds(),
    )
    .await?;

    notify::spawn_reset_email(
        state.mailer(),
        state.frontend_url().clone(),
        account.email.clone(),
        token,
    );

    info!(account_id = %account.id, "password reset requested");

    Ok(Json(MessageResponse::ok("Password reset link sent to your email")))
}

#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password replaced", body = MessageResponse),
        (status = 400, description = "Invalid, expired, exhausted, or mistyped token", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn reset_password(
    Extension(pool): Extension<PgPool>,
    payload: Option<Json<ResetPasswordRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;

    if request.new_password.len() < 8 {
        let mut errors = BTreeMap::new();
        errors.insert(
            "newPassword".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
        return Err(AuthError::Validation(errors));
    }

    let outcome =
        proofs::consume_link(&pool, request.token.trim(), ProofPurpose::PasswordReset).await?;

    let account_id = match outcome {
        proofs::LinkOutcome::Consumed { account_id } => account_id,
        proofs::LinkOutcome::Invalid => {
            return Err(AuthError::InvalidProof("Invalid reset token"));
        }
        proofs::LinkOutcome::Stale => {
            return Err(AuthError::ProofExpired("Token expired or already used"));
        }
        proofs::LinkOutcome::WrongPurpose => {
            return Err(AuthError::InvalidProof("Invalid token type"));
        }
    };

    let password_hash = password::hash(&request.new_password)?;

    accounts::update_password(&pool, account_id, &password_hash).await?;

    info!(account_id = %account_id, "password reset");

    Ok(Json(MessageResponse::ok("Password reset successfully")))
}
