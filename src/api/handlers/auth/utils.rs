//! Small helpers shared by the auth handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use regex::Regex;

use super::error::AuthError;

/// Lowercases and trims an email address so lookups and uniqueness checks
/// agree on one spelling.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shallow email shape check, one `@` with something on both sides and a
/// dot in the domain.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// E.164-ish phone shape, optional `+` and 7 to 15 digits.
pub fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\+?[0-9]{7,15}$").is_ok_and(|re| re.is_match(phone))
}

/// Pulls the bearer token out of the `Authorization` header, if any.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Best-effort client IP, `X-Forwarded-For` first hop, then `X-Real-IP`.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
}

/// Unwraps an optional JSON body, turning a missing body into a
/// validation failure instead of a bare 400.
pub fn require_body<T>(payload: Option<Json<T>>) -> Result<T, AuthError> {
    payload.map(|Json(body)| body).ok_or_else(|| {
        let mut errors = BTreeMap::new();
        errors.insert("body".to_string(), "Request body is required".to_string());
        AuthError::Validation(errors)
    })
}
