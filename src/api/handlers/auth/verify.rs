//! Contact verification, the emailed link and the phone OTP, plus OTP
//! resend.

use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::PgPool;
use tracing::info;

use super::error::AuthError;
use super::state::AuthState;
use super::types::{MessageResponse, ResendOtpRequest, VerifyEmailRequest, VerifyPhoneRequest};
use super::utils::require_body;
use crate::account::store as accounts;
use crate::notify;
use crate::proof::{ProofPurpose, store as proofs};
use crate::ratelimit::{RateLimitAction, RateLimitDecision};

#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid, expired, or exhausted token", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn verify_email(
    Extension(pool): Extension<PgPool>,
    payload: Option<Json<VerifyEmailRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;

    let outcome =
        proofs::consume_link(&pool, request.token.trim(), ProofPurpose::EmailVerify).await?;

    let account_id = match outcome {
        proofs::LinkOutcome::Consumed { account_id } => account_id,
        proofs::LinkOutcome::Invalid | proofs::LinkOutcome::WrongPurpose => {
            return Err(AuthError::InvalidProof("Invalid verification token"));
        }
        proofs::LinkOutcome::Stale => {
            return Err(AuthError::ProofExpired("Token expired or already used"));
        }
    };

    accounts::set_email_verified(&pool, account_id).await?;

    info!(account_id = %account_id, "email verified");

    Ok(Json(MessageResponse::ok("Email verified successfully")))
}

#[utoipa::path(
    post,
    path = "/auth/verify-phone",
    request_body = VerifyPhoneRequest,
    responses(
        (status = 200, description = "Phone number verified", body = MessageResponse),
        (status = 400, description = "Invalid, expired, exhausted, or mismatched OTP", body = MessageResponse),
        (status = 404, description = "No account for that phone number", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn verify_phone(
    Extension(pool): Extension<PgPool>,
    payload: Option<Json<VerifyPhoneRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;
    let phone = request.phone_number.trim();

    let account = accounts::find_by_phone(&pool, phone)
        .await?
        .ok_or(AuthError::NotFound("User not found"))?;

    match proofs::consume_otp(&pool, request.otp.trim(), phone, account.id).await? {
        proofs::OtpOutcome::Consumed => {}
        proofs::OtpOutcome::Invalid => return Err(AuthError::InvalidProof("Invalid OTP")),
        proofs::OtpOutcome::Stale => {
            return Err(AuthError::ProofExpired("OTP expired or exceeded retry limit"));
        }
        proofs::OtpOutcome::Mismatch => {
            return Err(AuthError::InvalidProof("OTP does not match user"));
        }
    }

    accounts::set_phone_verified(&pool, account.id).await?;

    info!(account_id = %account.id, "phone verified");

    Ok(Json(MessageResponse::ok("Phone number verified successfully")))
}

#[utoipa::path(
    post,
    path = "/auth/resend-otp",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Fresh OTP dispatched", body = MessageResponse),
        (status = 404, description = "No account for that phone number", body = MessageResponse),
        (status = 429, description = "Resend quota exhausted", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn resend_otp(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    payload: Option<Json<ResendOtpRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;
    let phone = request.phone_number.trim();

    // Counted before the account lookup so misses burn quota too.
    let decision = state
        .rate_limiter()
        .check(RateLimitAction::ResendOtp, phone)
        .await?;

    if matches!(decision, RateLimitDecision::Limited) {
        return Err(AuthError::RateLimited);
    }

    let account = accounts::find_by_phone(&pool, phone)
        .await?
        .ok_or(AuthError::NotFound("User not found"))?;

    let otp = proofs::issue(
        &pool,
        account.id,
        ProofPurpose::PhoneVerify,
        &account.phone,
        state.policy().otp_ttl_seconds(),
    )
    .await?;

    notify::spawn_otp_sms(state.sms(), account.phone.clone(), otp);

    info!(account_id = %account.id, "otp resent");

    Ok(Json(MessageResponse::ok("OTP sent successfully")))
}
