//! Session state machine

use serde::{Deserialize, Serialize};

/// Observable state of a session.
///
/// `Invalid` has no representation here: a token rejected by the backend
/// collapses immediately to `Anonymous` through a forced logout, so no
/// session is ever observed in an invalid state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No token held
    Anonymous,
    /// Token restored from storage, profile not yet confirmed by the backend
    TokenPendingVerification,
    /// Token and resolved profile both present
    Authenticated,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Anonymous => write!(f, "anonymous"),
            SessionState::TokenPendingVerification => write!(f, "pending-verification"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}
