//! Session manager
//!
//! Owns the bearer token and the resolved profile, keeps durable storage
//! in step with memory, and exposes the authentication operations the
//! rest of the application calls. Constructed explicitly and passed to
//! whichever component needs it.

use super::{SessionState, SessionStore};
use crate::access::RolePolicy;
use crate::{SessionError, SessionResult};
use encore_api::ApiClient;
use encore_core::{NewUser, Role, UserProfile};
use tracing::{debug, info, warn};

pub struct SessionManager {
    api: ApiClient,
    store: SessionStore,
    policy: RolePolicy,
    token: Option<String>,
    user: Option<UserProfile>,
}

impl SessionManager {
    /// Create a fresh anonymous session
    pub fn new(api: ApiClient, store: SessionStore, policy: RolePolicy) -> Self {
        Self {
            api,
            store,
            policy,
            token: None,
            user: None,
        }
    }

    /// Create a session from persisted storage.
    ///
    /// A restored token is unconfirmed until `refresh_current_user`
    /// resolves, so the session starts in `TokenPendingVerification`
    /// rather than `Authenticated`.
    pub fn restore(api: ApiClient, store: SessionStore, policy: RolePolicy) -> Self {
        let token = store.load().map(|persisted| persisted.token);

        if token.is_some() {
            debug!("Restored token from storage, profile pending verification");
        }

        Self {
            api,
            store,
            policy,
            token,
            user: None,
        }
    }

    /// The underlying API client, for resource calls outside the session's
    /// own lifecycle (courses, marketplace, schedule)
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Submit credentials and establish an authenticated session.
    ///
    /// On failure the prior session state is left untouched.
    pub async fn login(&mut self, email: &str, password: &str) -> SessionResult<UserProfile> {
        let token = self.api.auth.login(email, password).await?;

        // Token first, then the pair: the token entry must never lag the
        // in-memory token.
        self.store.save_token(&token.access_token)?;
        self.store.save(&token.access_token, &token.user)?;

        self.token = Some(token.access_token);
        self.user = Some(token.user.clone());

        info!(user = %token.user.email, role = %token.user.role, "Session established");
        Ok(token.user)
    }

    /// Register a new account, then log in with the same credentials
    pub async fn register(&mut self, new_user: NewUser) -> SessionResult<UserProfile> {
        let created = self.api.auth.register(&new_user).await?;
        debug!(user = %created.email, "Account created, performing auto-login");

        self.login(&new_user.email, &new_user.password).await
    }

    /// Re-resolve the current user behind the held token.
    ///
    /// Returns `None` without network access when no token is held. Any
    /// failure, transport or non-2xx alike, marks the token invalid and
    /// forces a logout; the error itself is never surfaced.
    pub async fn refresh_current_user(&mut self) -> SessionResult<Option<UserProfile>> {
        let token = match &self.token {
            Some(token) => token.clone(),
            None => return Ok(None),
        };

        match self.api.auth.me(&token).await {
            Ok(user) => {
                self.store.save(&token, &user)?;
                self.user = Some(user.clone());
                debug!(user = %user.email, "Profile refreshed");
                Ok(Some(user))
            }
            Err(e) => {
                warn!(error = %e, "Token rejected, forcing logout");
                self.logout()?;
                Ok(None)
            }
        }
    }

    /// Clear the session from memory and durable storage.
    ///
    /// Memory is cleared even if removing the storage entries fails, so a
    /// storage error never leaves a half-authenticated session behind.
    pub fn logout(&mut self) -> SessionResult<()> {
        self.token = None;
        self.user = None;

        self.store.clear()?;
        info!("Session cleared");
        Ok(())
    }

    /// True iff both token and resolved profile are present
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Current state of the session lifecycle
    pub fn state(&self) -> SessionState {
        match (&self.token, &self.user) {
            (None, _) => SessionState::Anonymous,
            (Some(_), None) => SessionState::TokenPendingVerification,
            (Some(_), Some(_)) => SessionState::Authenticated,
        }
    }

    /// Exact role equality; no hierarchy
    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().map(|u| u.role == role).unwrap_or(false)
    }

    /// Role check through the configured policy (admins may pass
    /// teacher-gated checks when the policy says so)
    pub fn satisfies(&self, role: Role) -> bool {
        self.user
            .as_ref()
            .map(|u| self.policy.satisfies(u.role, role))
            .unwrap_or(false)
    }

    /// The configured role policy
    pub fn policy(&self) -> RolePolicy {
        self.policy
    }

    /// The resolved profile, if any
    pub fn current_user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    /// The held bearer token; an error when anonymous.
    ///
    /// Callers are expected to check `is_authenticated()` first, or
    /// accept the rejected request.
    pub fn bearer(&self) -> SessionResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| SessionError::NotAuthenticated {
                message: "No bearer token held; log in first".to_string(),
            })
    }

    /// `Authorization: Bearer` plus JSON content-type headers for
    /// authenticated write calls
    pub fn auth_headers(&self) -> SessionResult<reqwest::header::HeaderMap> {
        let token = self.bearer()?;
        Ok(encore_api::bearer_headers(token)?)
    }

    /// Replace the user's instrument associations with the given set,
    /// then refresh the profile
    pub async fn update_instruments(&mut self, instrument_ids: &[i64]) -> SessionResult<UserProfile> {
        let token = self.bearer()?.to_string();

        let current: Vec<i64> = self
            .user
            .as_ref()
            .map(|u| u.instruments.iter().map(|i| i.id).collect())
            .unwrap_or_default();

        for id in current {
            self.api.auth.remove_instrument(&token, id).await?;
        }
        for id in instrument_ids {
            self.api.auth.add_instrument(&token, *id).await?;
        }

        match self.refresh_current_user().await? {
            Some(user) => {
                info!(count = instrument_ids.len(), "Instrument selection updated");
                Ok(user)
            }
            None => Err(SessionError::NotAuthenticated {
                message: "Session expired while updating instruments".to_string(),
            }),
        }
    }
}
