//! Users, bearer tokens and the auth middleware.
//!
//! Passwords are stored as salted SHA-256 digests. Tokens are random,
//! held in memory and expire after the configured TTL.

use std::sync::atomic::{AtomicI64, Ordering};

use ads_core::types::{Credentials, LoginResponse, UserInfo};
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use crate::handlers::ManagementState;
use crate::models::{AuthUser, ErrorResponse, TokenRecord, UserRecord};

const TOKEN_PREFIX: &str = "ads_";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("User already exists")]
    UserExists,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UserExists => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

pub struct AuthService {
    /// lower-cased email -> user
    users: DashMap<String, UserRecord>,
    /// token -> owner and expiry
    tokens: DashMap<String, TokenRecord>,
    next_user_id: AtomicI64,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(token_ttl_hours: i64) -> Self {
        Self {
            users: DashMap::new(),
            tokens: DashMap::new(),
            next_user_id: AtomicI64::new(1),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    pub fn register(&self, credentials: &Credentials) -> Result<UserInfo, AuthError> {
        let key = credentials.email.to_lowercase();
        let entry = match self.users.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => return Err(AuthError::UserExists),
            dashmap::mapref::entry::Entry::Vacant(entry) => entry,
        };
        let salt = random_hex(16);
        let user = UserRecord {
            id: self.next_user_id.fetch_add(1, Ordering::Relaxed),
            email: credentials.email.clone(),
            password_hash: hash_password(&salt, &credentials.password),
            salt,
            created_at: Utc::now(),
        };
        let info = UserInfo {
            id: user.id,
            email: user.email.clone(),
        };
        entry.insert(user);
        info!(user_id = info.id, "User registered");
        Ok(info)
    }

    pub fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        let user = self
            .users
            .get(&credentials.email.to_lowercase())
            .filter(|u| hash_password(&u.salt, &credentials.password) == u.password_hash)
            .ok_or(AuthError::InvalidCredentials)?;

        self.purge_expired();
        let token = generate_token();
        self.tokens.insert(
            token.clone(),
            TokenRecord {
                user_id: user.id,
                expires_at: Utc::now() + self.token_ttl,
            },
        );
        info!(user_id = user.id, "User logged in");
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            user: UserInfo {
                id: user.id,
                email: user.email.clone(),
            },
            access_token: token,
        })
    }

    /// Resolve a bearer token, dropping it if it has expired.
    pub fn authenticate(&self, token: &str) -> Option<AuthUser> {
        let record = *self.tokens.get(token)?;
        if record.expires_at <= Utc::now() {
            self.tokens.remove(token);
            debug!(user_id = record.user_id, "Expired token rejected");
            return None;
        }
        Some(AuthUser { id: record.user_id })
    }

    /// Drop every token past its expiry.
    fn purge_expired(&self) {
        let now = Utc::now();
        let before = self.tokens.len();
        self.tokens.retain(|_, record| record.expires_at > now);
        let purged = before.saturating_sub(self.tokens.len());
        if purged > 0 {
            debug!(purged, "Expired tokens purged");
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

fn generate_token() -> String {
    format!("{TOKEN_PREFIX}{}", random_hex(32))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Requires `Authorization: Bearer <token>` and makes the caller available
/// to handlers as `Extension<AuthUser>`.
pub async fn auth_middleware(
    State(state): State<ManagementState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return unauthorized("Missing Authorization Header");
    };
    match state.auth.authenticate(&token) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => unauthorized("Token has expired or is invalid"),
    }
}
