//! Durable session storage
//!
//! File-backed key-value store with two entries: `token` (the bearer
//! string) and `user.json` (the serialized profile). The pair is written
//! together and cleared together; a token-only write exists for the
//! window between receiving a token and resolving the profile. One
//! logical session per store directory, no multi-writer coordination.

use crate::{SessionError, SessionResult};
use encore_core::UserProfile;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TOKEN_FILE: &str = "token";
const USER_FILE: &str = "user.json";

/// Session data restored from disk
#[derive(Debug, Clone)]
pub struct PersistedSession {
    pub token: String,
    /// Cached profile from the last successful resolution. Treated as
    /// unconfirmed until a refresh succeeds.
    pub user: Option<UserProfile>,
}

/// File-backed storage for the session entries
pub struct SessionStore {
    storage_dir: PathBuf,
}

impl SessionStore {
    /// Open a store, creating the directory if needed
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> SessionResult<Self> {
        let storage_dir = storage_dir.as_ref().to_path_buf();

        std::fs::create_dir_all(&storage_dir).map_err(|e| SessionError::Storage {
            message: format!(
                "Failed to create storage directory {}: {}",
                storage_dir.display(),
                e
            ),
        })?;

        info!("Session storage initialized at: {}", storage_dir.display());

        Ok(Self { storage_dir })
    }

    fn token_path(&self) -> PathBuf {
        self.storage_dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.storage_dir.join(USER_FILE)
    }

    /// Persist token and profile together
    pub fn save(&self, token: &str, user: &UserProfile) -> SessionResult<()> {
        self.save_token(token)?;

        let json_data = serde_json::to_string_pretty(user).map_err(|e| SessionError::Storage {
            message: format!("Failed to serialize user profile: {}", e),
        })?;
        std::fs::write(self.user_path(), json_data).map_err(|e| SessionError::Storage {
            message: format!("Failed to write user entry: {}", e),
        })?;

        debug!("Persisted session for {}", user.email);
        Ok(())
    }

    /// Persist the token alone, before the profile has arrived
    pub fn save_token(&self, token: &str) -> SessionResult<()> {
        std::fs::write(self.token_path(), token).map_err(|e| SessionError::Storage {
            message: format!("Failed to write token entry: {}", e),
        })
    }

    /// Restore the persisted session, if any.
    ///
    /// A token entry without a readable user entry is still a session;
    /// the profile will be re-resolved. A corrupt user entry is dropped
    /// rather than failing the restore.
    pub fn load(&self) -> Option<PersistedSession> {
        let token = std::fs::read_to_string(self.token_path()).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            return None;
        }

        let user = match std::fs::read_to_string(self.user_path()) {
            Ok(json_data) => match serde_json::from_str(&json_data) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding corrupt user entry: {}", e);
                    None
                }
            },
            Err(_) => None,
        };

        debug!("Restored persisted session from {}", self.storage_dir.display());
        Some(PersistedSession { token, user })
    }

    /// Remove both entries. Missing entries are not an error.
    pub fn clear(&self) -> SessionResult<()> {
        for path in [self.token_path(), self.user_path()] {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    return Err(SessionError::Storage {
                        message: format!("Failed to remove {}: {}", path.display(), e),
                    });
                }
            }
        }

        debug!("Cleared persisted session");
        Ok(())
    }

    /// Whether a token entry currently exists on disk
    pub fn has_token(&self) -> bool {
        self.token_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::Role;

    fn sample_user() -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "a@x.com",
            "username": "anna",
            "first_name": null,
            "last_name": null,
            "role": "student",
            "is_active": true,
            "created_at": "2026-01-10T12:00:00Z",
            "instruments": []
        }))
        .unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();

        assert!(store.load().is_none());

        store.save("t1", &sample_user()).unwrap();
        let restored = store.load().unwrap();
        assert_eq!(restored.token, "t1");
        assert_eq!(restored.user.unwrap().role, Role::Student);
    }

    #[test]
    fn test_token_only_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();

        store.save_token("t2").unwrap();
        let restored = store.load().unwrap();
        assert_eq!(restored.token, "t2");
        assert!(restored.user.is_none());
    }

    #[test]
    fn test_clear_removes_both_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();

        store.save("t1", &sample_user()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(!store.has_token());

        // Clearing an already-empty store succeeds
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_user_entry_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path()).unwrap();

        store.save_token("t3").unwrap();
        std::fs::write(dir.path().join("user.json"), "{not json").unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored.token, "t3");
        assert!(restored.user.is_none());
    }
}
