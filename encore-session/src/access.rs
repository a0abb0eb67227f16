//! Role-gated visibility
//!
//! UI regions are tagged for guest, authenticated or per-role audiences;
//! the gating itself is a pure policy consulted by any front end. Role
//! comparison lives in exactly one place so call sites cannot hand-roll
//! their own hierarchy.

use crate::session::SessionManager;
use encore_core::Role;
use serde::{Deserialize, Serialize};

/// Who a piece of UI is intended for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Visible only when no session is established
    Guest,
    /// Visible to any authenticated user
    Authenticated,
    /// Visible to users whose role satisfies the policy for this role
    Role(Role),
}

/// Explicit role-comparison policy.
///
/// The backend checks roles strictly, so the default is strict equality.
/// Setting `admin_inherits_teacher` reproduces the historical UI
/// behavior where admins also saw teacher-gated sections.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RolePolicy {
    pub admin_inherits_teacher: bool,
}

impl RolePolicy {
    pub fn strict() -> Self {
        Self {
            admin_inherits_teacher: false,
        }
    }

    /// Whether a user holding `actual` passes a check requiring `required`
    pub fn satisfies(&self, actual: Role, required: Role) -> bool {
        if actual == required {
            return true;
        }
        self.admin_inherits_teacher && actual == Role::Admin && required == Role::Teacher
    }
}

/// Visibility gate applied uniformly across the application
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate {
    policy: RolePolicy,
}

impl AccessGate {
    pub fn new(policy: RolePolicy) -> Self {
        Self { policy }
    }

    /// Whether a region tagged for `audience` should be shown for the
    /// current session state
    pub fn visible(&self, audience: Audience, session: &SessionManager) -> bool {
        match audience {
            Audience::Guest => !session.is_authenticated(),
            Audience::Authenticated => session.is_authenticated(),
            Audience::Role(required) => session
                .current_user()
                .map(|user| self.policy.satisfies(user.role, required))
                .unwrap_or(false),
        }
    }
}
