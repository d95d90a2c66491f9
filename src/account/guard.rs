//! Lockout policy over the failed-login counter. Locks are advisory and
//! lazily lifted: nothing sweeps them, the next login attempt observes
//! `Lapsed` and resets the counter.

use chrono::{DateTime, Duration, Utc};

/// Where an account stands against the lockout window at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    /// No lock recorded.
    Clear,
    /// Lock still in force until the given instant.
    Locked { until: DateTime<Utc> },
    /// A lock exists but its window has elapsed, the caller should reset it.
    Lapsed,
}

#[must_use]
pub fn lock_state(
    locked_at: Option<DateTime<Utc>>,
    window: Duration,
    now: DateTime<Utc>,
) -> LockState {
    match locked_at {
        None => LockState::Clear,
        Some(at) => {
            let until = at + window;

            if now < until {
                LockState::Locked { until }
            } else {
                LockState::Lapsed
            }
        }
    }
}
