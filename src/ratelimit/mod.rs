//! Fixed-window rate limiting keyed by `(action, identifier)`. Counters are
//! consulted before the throttled flows run, a lapsed window starts a fresh
//! count of one.

pub mod postgres;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;

/// Throttled actions with their window policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitAction {
    ResendOtp,
    ForgotPassword,
}

impl RateLimitAction {
    /// Maximum calls inside one window.
    #[must_use]
    pub const fn cap(self) -> i32 {
        match self {
            Self::ResendOtp | Self::ForgotPassword => 3,
        }
    }

    /// Window length in seconds.
    #[must_use]
    pub const fn window_secs(self) -> i64 {
        match self {
            Self::ResendOtp => 60,
            Self::ForgotPassword => 3600,
        }
    }

    /// Window length as a duration.
    #[must_use]
    pub const fn window(self) -> Duration {
        Duration::from_secs(self.window_secs().unsigned_abs())
    }

    /// Counter key for one identifier, for example `otp:+15551234567`.
    #[must_use]
    pub fn bucket(self, identifier: &str) -> String {
        let prefix = match self {
            Self::ResendOtp => "otp",
            Self::ForgotPassword => "forgot-password",
        };

        format!("{prefix}:{identifier}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

/// Shared counter store consulted before throttled actions. Implementations
/// must increment atomically so concurrent calls cannot observe the same
/// slot twice.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, action: RateLimitAction, identifier: &str) -> Result<RateLimitDecision>;
}

/// Limiter that allows everything, for tests and one-off tooling.
pub struct NoopRateLimiter;

#[async_trait]
impl RateLimiter for NoopRateLimiter {
    async fn check(
        &self,
        _action: RateLimitAction,
        _identifier: &str,
    ) -> Result<RateLimitDecision> {
        Ok(RateLimitDecision::Allowed)
    }
}

struct Window {
    started: Instant,
    count: i32,
}

impl Window {
    /// Counts one call, restarting the window once it has lapsed. Returns
    /// the count the call landed on.
    fn advance(&mut self, now: Instant, window: Duration) -> i32 {
        if now.duration_since(self.started) > window {
            self.started = now;
            self.count = 0;
        }

        self.count += 1;
        self.count
    }
}

/// Process-local limiter. Only sound for single-instance deployments, the
/// counters are not shared across replicas.
#[derive(Default)]
pub struct MemoryRateLimiter {
    buckets: Mutex<HashMap<String, Window>>,
}

impl MemoryRateLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, action: RateLimitAction, identifier: &str) -> Result<RateLimitDecision> {
        let now = Instant::now();

        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let window = buckets
            .entry(action.bucket(identifier))
            .or_insert(Window { started: now, count: 0 });

        if window.advance(now, action.window()) > action.cap() {
            Ok(RateLimitDecision::Limited)
        } else {
            Ok(RateLimitDecision::Allowed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_keys() {
        assert_eq!(
            RateLimitAction::ResendOtp.bucket("+15551234567"),
            "otp:+15551234567"
        );
        assert_eq!(
            RateLimitAction::ForgotPassword.bucket("alice@example.com"),
            "forgot-password:alice@example.com"
        );
    }

    #[test]
    fn test_window_lapse_resets_count() {
        let mut window = Window {
            started: Instant::now() - Duration::from_secs(120),
            count: 3,
        };

        assert_eq!(window.advance(Instant::now(), Duration::from_secs(60)), 1);
    }

    #[test]
    fn test_window_keeps_counting_until_lapse() {
        let now = Instant::now();
        let mut window = Window {
            started: now,
            count: 2,
        };

        assert_eq!(window.advance(now, Duration::from_secs(60)), 3);
    }

    #[tokio::test]
    async fn test_memory_limiter_caps_the_fourth_call() {
        let limiter = MemoryRateLimiter::new();

        for _ in 0..3 {
            assert_eq!(
                limiter
                    .check(RateLimitAction::ResendOtp, "+15551234567")
                    .await
                    .unwrap(),
                RateLimitDecision::Allowed
            );
        }

        assert_eq!(
            limiter
                .check(RateLimitAction::ResendOtp, "+15551234567")
                .await
                .unwrap(),
            RateLimitDecision::Limited
        );
    }

    #[tokio::test]
    async fn test_memory_limiter_isolates_buckets() {
        let limiter = MemoryRateLimiter::new();

        for _ in 0..3 {
            limiter
                .check(RateLimitAction::ResendOtp, "+15551234567")
                .await
                .unwrap();
        }

        assert_eq!(
            limiter
                .check(RateLimitAction::ResendOtp, "+15557654321")
                .await
                .unwrap(),
            RateLimitDecision::Allowed
        );
        assert_eq!(
            limiter
                .check(RateLimitAction::ForgotPassword, "+15551234567")
                .await
                .unwrap(),
            RateLimitDecision::Allowed
        );
    }

    #[tokio::test]
    async fn test_noop_limiter_never_limits() {
        for _ in 0..5 {
            assert_eq!(
                NoopRateLimiter
                    .check(RateLimitAction::ForgotPassword, "alice@example.com")
                    .await
                    .unwrap(),
                RateLimitDecision::Allowed
            );
        }
    }
}
