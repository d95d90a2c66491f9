//! Bearer-token sessions. The database only ever sees token digests.

pub mod store;

use chrono::{DateTime, Utc};

/// Lifecycle of a stored session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Revoked,
    Expired,
}

impl SessionState {
    #[must_use]
    pub fn of(
        revoked_at: Option<DateTime<Utc>>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if revoked_at.is_some() {
            Self::Revoked
        } else if now >= expires_at {
            Self::Expired
        } else {
            Self::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn state_follows_revocation_and_expiry() {
        let now = Utc::now();
        let later = now + Duration::hours(1);

        assert_eq!(SessionState::of(None, later, now), SessionState::Active);
        assert_eq!(
            SessionState::of(Some(now), later, now),
            SessionState::Revoked
        );
        assert_eq!(
            SessionState::of(None, now - Duration::hours(1), now),
            SessionState::Expired
        );
    }

    #[test]
    fn revocation_wins_over_expiry() {
        let now = Utc::now();

        assert_eq!(
            SessionState::of(Some(now), now - Duration::hours(1), now),
            SessionState::Revoked
        );
    }
}
