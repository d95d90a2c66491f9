//! Password hashing. Argon2id with a per-password random salt, verification
//! treats any malformed stored hash as a mismatch.

use anyhow::{Result, anyhow};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;

/// Hashes a plaintext password into PHC string format.
pub fn hash(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Checks a plaintext password against a stored PHC hash.
#[must_use]
pub fn verify(plaintext: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("correct horse battery staple").unwrap();

        assert!(hashed.starts_with("$argon2"));
        assert!(verify("correct horse battery staple", &hashed));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hashed = hash("correct horse battery staple").unwrap();

        assert!(!verify("incorrect horse", &hashed));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify("anything", "not-a-phc-string"));
        assert!(!verify("anything", ""));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash("same password").unwrap();
        let second = hash("same password").unwrap();

        assert_ne!(first, second);
    }
}
