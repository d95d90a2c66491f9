use crate::api::{self, handlers::auth::AuthPolicy};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub frontend_base_url: String,
    pub access_token_ttl_seconds: i64,
    pub refresh_token_ttl_seconds: i64,
    pub link_token_ttl_seconds: i64,
    pub otp_ttl_seconds: i64,
    pub challenge_ttl_seconds: i64,
    pub lockout_threshold: i32,
    pub lockout_window_minutes: i64,
    pub sweep_interval_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let policy = AuthPolicy::new(args.frontend_base_url)
        .with_access_ttl_seconds(args.access_token_ttl_seconds)
        .with_refresh_ttl_seconds(args.refresh_token_ttl_seconds)
        .with_link_ttl_seconds(args.link_token_ttl_seconds)
        .with_otp_ttl_seconds(args.otp_ttl_seconds)
        .with_challenge_ttl_seconds(args.challenge_ttl_seconds)
        .with_lockout_threshold(args.lockout_threshold)
        .with_lockout_window_minutes(args.lockout_window_minutes);

    api::new(
        args.port,
        args.dsn,
        args.sweep_interval_seconds,
        &args.jwt_secret,
        policy,
    )
    .await
}
