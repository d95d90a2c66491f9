//! The auth surface: registration, contact verification, login
//! challenges, login, password recovery, and session lifecycle.

pub mod challenge;
pub mod error;
pub mod login;
pub mod recovery;
pub mod register;
pub mod session;
pub mod state;
pub mod types;
mod utils;
pub mod verify;

pub use error::AuthError;
pub use state::{AuthPolicy, AuthState};
