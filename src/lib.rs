//! # Gatehouse (Credential & Session Authority)
//!
//! `gatehouse` registers accounts, proves possession of email and phone,
//! authenticates logins behind a human-verification challenge, issues and
//! revokes sessions, and guards against brute-force and automated abuse.
//!
//! ## Proof model
//!
//! Every verification artifact is a single-use, time-bounded proof:
//!
//! - **Email token / reset token:** 32 random bytes, URL-safe base64, sent
//!   as a deep link to the frontend.
//! - **Phone OTP:** fixed-length numeric code. Several OTPs may be pending
//!   for the same phone; any usable one verifies.
//! - **Login challenge:** a human-verification question issued before the
//!   credential check. The attempt counter increments on every validation,
//!   pass or fail, and is capped at three.
//!
//! A proof moves `Pending -> Consumed` exactly once, or ages into
//! `Expired`; stale rows are purged by a background sweeper.
//!
//! ## Sessions
//!
//! The database stores only SHA-256 digests of bearer tokens. A session is
//! valid while it is unrevoked and unexpired; logout revokes one digest,
//! logout-all revokes every session of the account.
//!
//! ## Lockout
//!
//! Five consecutive failed logins lock the account for fifteen minutes.
//! The lock is advisory and lazily lifted on the next check after the
//! window elapses; no sweeper touches it.

pub mod account;
pub mod api;
pub mod challenge;
pub mod cli;
pub mod notify;
pub mod password;
pub mod proof;
pub mod ratelimit;
pub mod session;
pub mod sweeper;
#[cfg(test)]
mod test_support;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
