//! Outbound email and SMS. Delivery is pluggable behind traits, the default
//! implementations emit the payload through the logs so the flows stay
//! observable without a configured transport.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use url::Url;

pub trait Mailer: Send + Sync {
    fn send_verification_email(&self, to: &str, link: &str) -> Result<()>;
    fn send_password_reset_email(&self, to: &str, link: &str) -> Result<()>;
}

pub trait SmsSender: Send + Sync {
    fn send_otp(&self, phone: &str, code: &str) -> Result<()>;
}

/// Log-only mailer, the deep link lands in the logs instead of an inbox.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_verification_email(&self, to: &str, link: &str) -> Result<()> {
        info!(to_email = %to, verify_url = %link, "verification email (log delivery)");

        Ok(())
    }

    fn send_password_reset_email(&self, to: &str, link: &str) -> Result<()> {
        info!(to_email = %to, reset_url = %link, "password reset email (log delivery)");

        Ok(())
    }
}

/// Log-only SMS provider.
pub struct LogSms;

impl SmsSender for LogSms {
    fn send_otp(&self, phone: &str, code: &str) -> Result<()> {
        info!(to_phone = %phone, code = %code, "one-time code (log delivery)");

        Ok(())
    }
}

/// Link the frontend resolves to its email-verification form.
#[must_use]
pub fn verify_email_url(frontend: &Url, token: &str) -> String {
    deep_link(frontend, "auth/verify-email", token)
}

/// Link the frontend resolves to its password-reset form.
#[must_use]
pub fn reset_password_url(frontend: &Url, token: &str) -> String {
    deep_link(frontend, "auth/reset-password", token)
}

fn deep_link(frontend: &Url, path: &str, token: &str) -> String {
    let mut url = frontend.clone();

    url.set_path(path);
    url.set_query(Some(&format!("token={token}")));

    url.to_string()
}

/// Sends the verification email off the request path. Delivery failure is
/// logged, never surfaced to the caller.
pub fn spawn_verification_email(mailer: Arc<dyn Mailer>, frontend: Url, to: String, token: String) {
    tokio::spawn(async move {
        let link = verify_email_url(&frontend, &token);

        if let Err(err) = mailer.send_verification_email(&to, &link) {
            error!(to_email = %to, "failed to send verification email: {err}");
        }
    });
}

/// Sends the password-reset email off the request path.
pub fn spawn_reset_email(mailer: Arc<dyn Mailer>, frontend: Url, to: String, token: String) {
    tokio::spawn(async move {
        let link = reset_password_url(&frontend, &token);

        if let Err(err) = mailer.send_password_reset_email(&to, &link) {
            error!(to_email = %to, "failed to send password reset email: {err}");
        }
    });
}

/// Sends the one-time code off the request path.
pub fn spawn_otp_sms(sms: Arc<dyn SmsSender>, phone: String, code: String) {
    tokio::spawn(async move {
        if let Err(err) = sms.send_otp(&phone, &code) {
            error!(to_phone = %phone, "failed to send one-time code: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_email_url() {
        let base = Url::parse("http://localhost:3000").unwrap();

        assert_eq!(
            verify_email_url(&base, "abc123"),
            "http://localhost:3000/auth/verify-email?token=abc123"
        );
    }

    #[test]
    fn test_reset_password_url_ignores_trailing_slash() {
        let base = Url::parse("https://app.example.com/").unwrap();

        assert_eq!(
            reset_password_url(&base, "t0k"),
            "https://app.example.com/auth/reset-password?token=t0k"
        );
    }

    #[test]
    fn test_log_senders_always_succeed() {
        assert!(LogMailer
            .send_verification_email("alice@example.com", "http://x/verify")
            .is_ok());
        assert!(LogMailer
            .send_password_reset_email("alice@example.com", "http://x/reset")
            .is_ok());
        assert!(LogSms.send_otp("+15551234567", "123456").is_ok());
    }
}
