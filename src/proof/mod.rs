//! Verification proofs. Email links, password-reset links, and phone
//! one-time codes share one lifecycle: issued pending, consumed exactly
//! once, or left to expire.

pub mod store;

use chrono::{DateTime, Utc};

/// Digits in a phone one-time code.
pub const OTP_LENGTH: usize = 6;

/// Attempt budget per proof. Once spent, the proof never validates again,
/// expired or not.
pub const MAX_ATTEMPTS: i32 = 3;

/// What a proof authorizes once consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofPurpose {
    EmailVerify,
    PasswordReset,
    PhoneVerify,
}

impl ProofPurpose {
    /// Tag stored in the `purpose` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerify => "EMAIL_VERIFY",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::PhoneVerify => "PHONE_VERIFY",
        }
    }
}

/// Lifecycle of a proof. `Pending` is the only state a consume can succeed
/// from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofState {
    Pending,
    Consumed,
    Expired,
}

impl ProofState {
    #[must_use]
    pub fn of(
        consumed_at: Option<DateTime<Utc>>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if consumed_at.is_some() {
            Self::Consumed
        } else if now >= expires_at {
            Self::Expired
        } else {
            Self::Pending
        }
    }
}

/// Whether a consume may still succeed against this proof.
#[must_use]
pub fn usable(state: ProofState, attempts: i32) -> bool {
    state == ProofState::Pending && attempts < MAX_ATTEMPTS
}
