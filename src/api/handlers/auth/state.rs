//! Auth policy knobs and the shared handler state.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;
use secrecy::SecretString;
use url::Url;

use crate::notify::{Mailer, SmsSender};
use crate::ratelimit::RateLimiter;
use crate::token::jwt::TokenSigner;

const DEFAULT_ACCESS_TTL_SECONDS: i64 = 24 * 60 * 60;
const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_LINK_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_OTP_TTL_SECONDS: i64 = 5 * 60;
const DEFAULT_CHALLENGE_TTL_SECONDS: i64 = 5 * 60;
const DEFAULT_LOCKOUT_THRESHOLD: i32 = 5;
const DEFAULT_LOCKOUT_WINDOW_MINUTES: i64 = 15;

#[derive(Clone, Debug)]
pub struct AuthPolicy {
    frontend_base_url: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
    link_ttl_seconds: i64,
    otp_ttl_seconds: i64,
    challenge_ttl_seconds: i64,
    lockout_threshold: i32,
    lockout_window_minutes: i64,
}

impl AuthPolicy {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            access_ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            refresh_ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            link_ttl_seconds: DEFAULT_LINK_TTL_SECONDS,
            otp_ttl_seconds: DEFAULT_OTP_TTL_SECONDS,
            challenge_ttl_seconds: DEFAULT_CHALLENGE_TTL_SECONDS,
            lockout_threshold: DEFAULT_LOCKOUT_THRESHOLD,
            lockout_window_minutes: DEFAULT_LOCKOUT_WINDOW_MINUTES,
        }
    }

    #[must_use]
    pub fn with_access_ttl_seconds(mut self, seconds: i64) -> Self {
        self.access_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_refresh_ttl_seconds(mut self, seconds: i64) -> Self {
        self.refresh_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_link_ttl_seconds(mut self, seconds: i64) -> Self {
        self.link_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_otp_ttl_seconds(mut self, seconds: i64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_challenge_ttl_seconds(mut self, seconds: i64) -> Self {
        self.challenge_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_lockout_threshold(mut self, threshold: i32) -> Self {
        self.lockout_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_lockout_window_minutes(mut self, minutes: i64) -> Self {
        self.lockout_window_minutes = minutes;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_seconds
    }

    pub(super) fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_seconds
    }

    pub(super) fn link_ttl_seconds(&self) -> i64 {
        self.link_ttl_seconds
    }

    pub(super) fn otp_ttl_seconds(&self) -> i64 {
        self.otp_ttl_seconds
    }

    pub(super) fn challenge_ttl_seconds(&self) -> i64 {
        self.challenge_ttl_seconds
    }

    pub(super) fn lockout_threshold(&self) -> i32 {
        self.lockout_threshold
    }

    pub(super) fn lockout_window(&self) -> Duration {
        Duration::minutes(self.lockout_window_minutes)
    }
}

/// Everything the auth handlers share: the policy, the token signer, and
/// the pluggable collaborators.
pub struct AuthState {
    policy: AuthPolicy,
    frontend_url: Url,
    signer: TokenSigner,
    rate_limiter: Arc<dyn RateLimiter>,
    mailer: Arc<dyn Mailer>,
    sms: Arc<dyn SmsSender>,
}

impl AuthState {
    /// Builds the state, deriving the token signer from the policy TTLs.
    ///
    /// # Errors
    ///
    /// Fails when the frontend base URL does not parse.
    pub fn new(
        policy: AuthPolicy,
        jwt_secret: &SecretString,
        rate_limiter: Arc<dyn RateLimiter>,
        mailer: Arc<dyn Mailer>,
        sms: Arc<dyn SmsSender>,
    ) -> Result<Self> {
        let frontend_url = Url::parse(policy.frontend_base_url()).with_context(|| {
            format!("Invalid frontend base URL: {}", policy.frontend_base_url())
        })?;

        let signer = TokenSigner::new(
            jwt_secret,
            Duration::seconds(policy.access_ttl_seconds()),
            Duration::seconds(policy.refresh_ttl_seconds()),
        );

        Ok(Self {
            policy,
            frontend_url,
            signer,
            rate_limiter,
            mailer,
            sms,
        })
    }

    #[must_use]
    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    pub(super) fn frontend_url(&self) -> &Url {
        &self.frontend_url
    }

    pub(super) fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    pub(super) fn rate_limiter(&self) -> &dyn RateLimiter {
        self.rate_limiter.as_ref()
    }

    pub(super) fn mailer(&self) -> Arc<dyn Mailer> {
        Arc::clone(&self.mailer)
    }

    pub(super) fn sms(&self) -> Arc<dyn SmsSender> {
        Arc::clone(&self.sms)
    }
}
