//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the
//! appropriate action, such as starting the API server with its full
//! configuration state.

use crate::cli::actions::{Action, server::Args};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let jwt_secret = matches
        .get_one::<String>("jwt-secret")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-secret")?;
    let frontend_base_url = matches
        .get_one::<String>("frontend-base-url")
        .cloned()
        .context("missing required argument: --frontend-base-url")?;

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret,
        frontend_base_url,
        access_token_ttl_seconds: matches
            .get_one::<i64>("access-token-ttl-seconds")
            .copied()
            .unwrap_or(86_400),
        refresh_token_ttl_seconds: matches
            .get_one::<i64>("refresh-token-ttl-seconds")
            .copied()
            .unwrap_or(604_800),
        link_token_ttl_seconds: matches
            .get_one::<i64>("link-token-ttl-seconds")
            .copied()
            .unwrap_or(3600),
        otp_ttl_seconds: matches
            .get_one::<i64>("otp-ttl-seconds")
            .copied()
            .unwrap_or(300),
        challenge_ttl_seconds: matches
            .get_one::<i64>("challenge-ttl-seconds")
            .copied()
            .unwrap_or(300),
        lockout_threshold: matches
            .get_one::<i32>("lockout-threshold")
            .copied()
            .unwrap_or(5),
        lockout_window_minutes: matches
            .get_one::<i64>("lockout-window-minutes")
            .copied()
            .unwrap_or(15),
        sweep_interval_seconds: matches
            .get_one::<u64>("sweep-interval-seconds")
            .copied()
            .unwrap_or(3600),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn builds_a_server_action_from_args() {
        temp_env::with_vars(
            [
                ("GATEHOUSE_PORT", None::<&str>),
                ("GATEHOUSE_DSN", None),
                ("GATEHOUSE_JWT_SECRET", None),
                ("GATEHOUSE_FRONTEND_BASE_URL", None),
            ],
            || {
                let command = crate::cli::commands::new();
                let matches = command.get_matches_from(vec![
                    "gatehouse",
                    "--port",
                    "9000",
                    "--dsn",
                    "postgres://user@localhost:5432/gatehouse",
                    "--jwt-secret",
                    "0123456789abcdef",
                    "--lockout-threshold",
                    "3",
                ]);

                let Action::Server(args) = handler(&matches).unwrap();

                assert_eq!(args.port, 9000);
                assert_eq!(args.dsn, "postgres://user@localhost:5432/gatehouse");
                assert_eq!(args.jwt_secret.expose_secret(), "0123456789abcdef");
                assert_eq!(args.frontend_base_url, "http://localhost:3000");
                assert_eq!(args.access_token_ttl_seconds, 86_400);
                assert_eq!(args.refresh_token_ttl_seconds, 604_800);
                assert_eq!(args.link_token_ttl_seconds, 3600);
                assert_eq!(args.otp_ttl_seconds, 300);
                assert_eq!(args.challenge_ttl_seconds, 300);
                assert_eq!(args.lockout_threshold, 3);
                assert_eq!(args.lockout_window_minutes, 15);
                assert_eq!(args.sweep_interval_seconds, 3600);
            },
        );
    }
}
