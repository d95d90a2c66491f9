use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    let command = with_token_args(command);
    let command = with_proof_args(command);
    with_guard_args(command)
}

fn with_token_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("jwt-secret")
                .long("jwt-secret")
                .help("HMAC secret for signing access and refresh tokens")
                .env("GATEHOUSE_JWT_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("frontend-base-url")
                .long("frontend-base-url")
                .help("Frontend base URL used for verification and reset links")
                .env("GATEHOUSE_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("access-token-ttl-seconds")
                .long("access-token-ttl-seconds")
                .help("Access token TTL in seconds")
                .env("GATEHOUSE_ACCESS_TOKEN_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("refresh-token-ttl-seconds")
                .long("refresh-token-ttl-seconds")
                .help("Refresh token TTL in seconds")
                .env("GATEHOUSE_REFRESH_TOKEN_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64)),
        )
}

fn with_proof_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("link-token-ttl-seconds")
                .long("link-token-ttl-seconds")
                .help("Email verification and password reset token TTL in seconds")
                .env("GATEHOUSE_LINK_TOKEN_TTL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("otp-ttl-seconds")
                .long("otp-ttl-seconds")
                .help("Phone OTP TTL in seconds")
                .env("GATEHOUSE_OTP_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("challenge-ttl-seconds")
                .long("challenge-ttl-seconds")
                .help("Login challenge TTL in seconds")
                .env("GATEHOUSE_CHALLENGE_TTL_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("sweep-interval-seconds")
                .long("sweep-interval-seconds")
                .help("Interval between expired proof sweeps in seconds")
                .env("GATEHOUSE_SWEEP_INTERVAL_SECONDS")
                .default_value("3600")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn with_guard_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("lockout-threshold")
                .long("lockout-threshold")
                .help("Consecutive failed logins before an account locks")
                .env("GATEHOUSE_LOCKOUT_THRESHOLD")
                .default_value("5")
                .value_parser(clap::value_parser!(i32)),
        )
        .arg(
            Arg::new("lockout-window-minutes")
                .long("lockout-window-minutes")
                .help("How long a locked account stays locked in minutes")
                .env("GATEHOUSE_LOCKOUT_WINDOW_MINUTES")
                .default_value("15")
                .value_parser(clap::value_parser!(i64)),
        )
}
