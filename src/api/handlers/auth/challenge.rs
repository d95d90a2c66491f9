//! Human-verification challenge issuance.
//!
//! Login is a two-step dance: fetch a challenge here, then send its token
//! and answer along with the credentials.

use std::sync::Arc;

use axum::{Extension, Json};
use sqlx::PgPool;

use super::error::AuthError;
use super::state::AuthState;
use super::types::ChallengeResponse;
use crate::challenge::store as challenges;

#[utoipa::path(
    get,
    path = "/auth/login-challenge",
    responses(
        (status = 200, description = "A fresh challenge", body = ChallengeResponse),
    ),
    tag = "auth"
)]
pub async fn login_challenge(
    Extension(pool): Extension<PgPool>,
    Extension(state): Extension<Arc<AuthState>>,
) -> Result<Json<ChallengeResponse>, AuthError> {
    let issued = challenges::generate(&pool, state.policy().challenge_ttl_seconds()).await?;

    Ok(Json(ChallengeResponse {
        challenge_token: issued.token,
        challenge_type: issued.kind.as_str().to_string(),
        question: issued.question,
        options: issued.options,
        expires_in: issued.expires_in,
    }))
}
