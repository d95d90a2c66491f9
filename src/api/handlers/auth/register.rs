//! Account registration.
//!
//! A new account starts unverified on both channels. Registration issues
//! an email verification link and a phone OTP in one go, dispatched off
//! the request path.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::PgPool;
use tracing::info;

use super::error::AuthError;
use super::state::AuthState;
use super::types::{MessageResponse, RegisterRequest, ValidationResponse};
use super::utils::{normalize_email, require_body, valid_email, valid_phone};
use crate::account::store::{self as accounts, InsertOutcome, NewAccount};
use crate::notify;
use crate::password;
use crate::proof::{ProofPurpose, store as proofs};

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, verification proofs dispatched", body = MessageResponse),
        (status = 400, description = "Validation failed", body = ValidationResponse),
        (status = 409, description = "Username, email, or phone already registered", body = MessageResponse),
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let request = require_body(payload)?;

    let username = request.username.trim();
    let full_name = request.full_name.trim();
    let email = normalize_email(&request.email);
    let phone = request.phone_number.trim();

    validate_registration(username, full_name, &email, phone, &request.password)?;

    if accounts::username_taken(&pool, username).await? {
        return Err(AuthError::Conflict("Username already taken"));
    }

    if accounts::email_taken(&pool, &email).await? {
        return Err(AuthError::Conflict("Email already registered"));
    }

    if accounts::phone_taken(&pool, phone).await? {
        return Err(AuthError::Conflict("Phone number already registered"));
    }

    let password_hash = password::hash(&request.password)?;

    let new = NewAccount {
        username,
        full_name,
        email: &email,
        phone,
        password_hash: &password_hash,
    };

    let account = match accounts::insert(&pool, &new).await? {
        InsertOutcome::Created(account) => account,
        // Lost a race with a concurrent registration between the checks
        // above and the insert.
        InsertOutcome::Duplicate => return Err(AuthError::Conflict("Account already exists")),
    };

    let link_token = proofs::issue(
        &pool,
        account.id,
        ProofPurpose::EmailVerify,
        &account.email,
        state.policy().link_ttl_seconds(),
    )
    .await?;

    let otp = proofs::issue(
        &pool,
        account.id,
        ProofPurpose::PhoneVerify,
        &account.phone,
        state.policy().otp_ttl_seconds(),
    )
    .await?;

    notify::spawn_verification_email(
        state.mailer(),
        state.frontend_url().clone(),
        account.email.clone(),
        link_token,
    );
    notify::spawn_otp_sms(state.sms(), account.phone.clone(), otp);

    info!(account_id = %account.id, "account registered");

    Ok(Json(MessageResponse::ok(
        "Registration successful. Please verify your email and phone number.",
    )))
}

fn validate_registration(
    username: &str,
    full_name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<(), AuthError> {
    let mut errors = BTreeMap::new();

    if username.len() < 3 || username.len() > 50 {
        errors.insert(
            "username".to_string(),
            "Username must be between 3 and 50 characters".to_string(),
        );
    }

    if full_name.is_empty() || full_name.len() > 100 {
        errors.insert(
            "fullName".to_string(),
            "Full name must be between 1 and 100 characters".to_string(),
        );
    }

    if !valid_email(email) {
        errors.insert("email".to_string(), "Email must be valid".to_string());
    }

    if !valid_phone(phone) {
        errors.insert(
            "phoneNumber".to_string(),
            "Phone number must be valid".to_string(),
        );
    }

    if password.len() < 8 {
        errors.insert(
            "password".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}
