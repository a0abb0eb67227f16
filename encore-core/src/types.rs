//! Core data type definitions
//!
//! The user-facing data model shared between the API client and the
//! session manager. Profiles are replaced wholesale on every refresh,
//! never partially mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role, gating visibility of UI regions and backend operations.
///
/// The backend is expected to seed every account with one of these
/// three roles. A profile carrying any other role string fails to
/// deserialize rather than being silently mapped onto a known role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// An instrument taught by the school
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInstrument {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Resolved user profile, owned exclusively by the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub instruments: Vec<Instrument>,
}

impl UserProfile {
    /// Display string for logs and the CLI
    pub fn display_string(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {} <{}>", first, last, self.email),
            _ => format!("{} <{}>", self.username, self.email),
        }
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
}

/// Response from the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}
