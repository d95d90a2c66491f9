//! Error taxonomy for the auth surface.
//!
//! Every failure maps to exactly one status code and a caller-safe
//! message. Unknown identifiers and wrong passwords share one message so
//! the surface does not leak which accounts exist.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use super::types::{MessageResponse, ValidationResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Invalid email/phone or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidProof(&'static str),

    #[error("{0}")]
    ProofExpired(&'static str),

    #[error("Account is locked. Please try again later.")]
    AccountLocked,

    #[error("Please verify your email and phone number before logging in")]
    NotVerified,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidProof(_) | Self::ProofExpired(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::AccountLocked => StatusCode::LOCKED,
            Self::NotVerified => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            Self::Validation(errors) => (
                status,
                Json(ValidationResponse {
                    success: false,
                    message: "Validation failed".to_string(),
                    data: errors,
                }),
            )
                .into_response(),

            Self::Internal(err) => {
                error!("internal error: {err:#}");

                (
                    status,
                    Json(MessageResponse {
                        success: false,
                        message: "An unexpected error occurred".to_string(),
                    }),
                )
                    .into_response()
            }

            other => (
                status,
                Json(MessageResponse {
                    success: false,
                    message: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AuthError::Conflict("Username already taken").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AuthError::NotFound("User not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AuthError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidProof("Invalid OTP").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::ProofExpired("Token expired or already used").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::AccountLocked.status(), StatusCode::LOCKED);
        assert_eq!(AuthError::NotVerified.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Unauthorized("Human verification failed").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            AuthError::Validation(BTreeMap::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Internal(anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn credential_failures_share_one_message() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email/phone or password"
        );
    }

    #[test]
    fn internal_errors_are_masked() {
        let response = AuthError::Internal(anyhow!("connection refused")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn validation_response_carries_the_field_map() {
        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), "Email must be valid".to_string());

        let response = AuthError::Validation(errors).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Validation failed");
        assert_eq!(value["data"]["email"], "Email must be valid");
    }
}
