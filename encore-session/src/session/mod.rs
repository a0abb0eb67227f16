//! Session lifecycle
//!
//! The manager drives the token/profile state machine; the store is the
//! durable key-value persistence surviving restarts.

pub mod manager;
pub mod storage;
pub mod types;

pub use manager::SessionManager;
pub use storage::{PersistedSession, SessionStore};
pub use types::SessionState;
