//! Signed bearer tokens. Access tokens carry the account identity, refresh
//! tokens only the subject, both HS256 over a shared secret.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Access and refresh token for one login, with the access expiry in seconds.
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub expires_in: i64,
}

/// Signs and verifies bearer tokens with a single HS256 secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    #[must_use]
    pub fn new(secret: &SecretString, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();

        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issues a fresh access/refresh pair for the account. The `jti` claim
    /// keeps two logins in the same second from producing identical tokens.
    pub fn issue(&self, account_id: Uuid, username: &str, roles: &[String]) -> Result<TokenPair> {
        let now = Utc::now();

        let access = AccessClaims {
            sub: username.to_owned(),
            user_id: account_id,
            username: username.to_owned(),
            roles: roles.to_vec(),
            jti: Ulid::new().to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        let refresh = RefreshClaims {
            sub: username.to_owned(),
            jti: Ulid::new().to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        Ok(TokenPair {
            access: encode(&Header::default(), &access, &self.encoding)
                .context("failed to sign access token")?,
            refresh: encode(&Header::default(), &refresh, &self.encoding)
                .context("failed to sign refresh token")?,
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Decodes an access token, rejecting bad signatures and expired claims.
    pub fn verify(&self, raw: &str) -> Result<AccessClaims> {
        decode::<AccessClaims>(raw, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .context("invalid access token")
    }
}
