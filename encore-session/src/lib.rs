//! Encore Session - authentication lifecycle and role-gated visibility
//!
//! This crate owns the client-side session: the bearer token and the
//! resolved user profile, their persistence across restarts, and the
//! visibility rules the rest of the application consults. It builds on
//! `encore-api` for network access and is constructed explicitly by the
//! caller; there is no ambient global session.

pub mod access;
pub mod session;

pub use access::{AccessGate, Audience, RolePolicy};
pub use session::{PersistedSession, SessionManager, SessionState, SessionStore};

/// Session-level error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Core(#[from] encore_core::EncoreError),

    #[error("No active session: {message}")]
    NotAuthenticated { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },
}

pub type SessionResult<T> = Result<T, SessionError>;
