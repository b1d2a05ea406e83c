//! Server-side records and wire types not shared with the console.
//!
//! Entities and request payloads live in `ads_core::types`.

use ads_core::types::EntityId;
use ads_core::validation::CredentialsForm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Users / tokens ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: EntityId,
    pub email: String,
    pub salt: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct TokenRecord {
    pub user_id: EntityId,
    pub expires_at: DateTime<Utc>,
}

/// The caller resolved from a bearer token, inserted by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: EntityId,
}

/// Login/register body. Fields default to empty so a missing field gets the
/// same 400 as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsBody {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<CredentialsBody> for CredentialsForm {
    fn from(body: CredentialsBody) -> Self {
        CredentialsForm {
            email: body.email,
            password: body.password,
        }
    }
}

// ─── API Request/Response types ────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}
