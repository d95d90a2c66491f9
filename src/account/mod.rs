//! Account records, their storage, and the lockout guard.

pub mod guard;
pub mod store;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One row from the `accounts` table.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub enabled: bool,
    pub failed_logins: i32,
    pub locked_at: Option<DateTime<Utc>>,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Login requires both contact channels proven.
    #[must_use]
    pub fn fully_verified(&self) -> bool {
        self.email_verified && self.phone_verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(email_verified: bool, phone_verified: bool) -> Account {
        Account {
            id: Uuid::nil(),
            username: "alice".to_string(),
            full_name: "Alice Example".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+15551234567".to_string(),
            password_hash: String::new(),
            email_verified,
            phone_verified,
            enabled: true,
            failed_logins: 0,
            locked_at: None,
            roles: vec!["USER".to_string()],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn fully_verified_needs_both_channels() {
        assert!(account(true, true).fully_verified());
        assert!(!account(true, false).fully_verified());
        assert!(!account(false, true).fully_verified());
        assert!(!account(false, false).fully_verified());
    }
}
