//! Secret generation and digest helpers for proofs and sessions.

pub mod jwt;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::{Rng, RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Number of random bytes behind a link token, 43 characters once encoded.
const LINK_TOKEN_BYTES: usize = 32;

/// Generates a URL-safe token for email-verification and password-reset links.
pub fn link_token() -> Result<String> {
    let mut bytes = [0u8; LINK_TOKEN_BYTES];

    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate link token")?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Generates a numeric one-time code, zero-padded to `length` digits.
#[must_use]
pub fn otp(length: usize) -> String {
    let mut rng = OsRng;

    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Base64 encoding of the SHA-256 digest of `raw`. Sessions store this,
/// never the raw bearer token.
#[must_use]
pub fn digest(raw: &str) -> String {
    STANDARD.encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_token_shape() {
        let token = link_token().unwrap();

        assert_eq!(token.len(), 43);

        let decoded = URL_SAFE_NO_PAD.decode(&token).unwrap();
        assert_eq!(decoded.len(), LINK_TOKEN_BYTES);
    }

    #[test]
    fn test_link_tokens_are_unique() {
        let first = link_token().unwrap();
        let second = link_token().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_otp_is_numeric() {
        let code = otp(6);

        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_otp_length_follows_request() {
        assert_eq!(otp(4).len(), 4);
        assert_eq!(otp(8).len(), 8);
    }

    #[test]
    fn test_digest_known_value() {
        assert_eq!(
            digest("hello"),
            "LPJNul+wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ="
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(digest("bearer-token"), digest("bearer-token"));
        assert_ne!(digest("bearer-token"), digest("bearer-token2"));
    }
}
