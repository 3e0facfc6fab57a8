//! Shared data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;

/// Stored credential record. The hash never leaves the credential store
/// through a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
}

impl User {
    /// New user with a fresh random id.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Stored event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_by_id: String,
}

impl Event {
    /// Build a record attributed to the verified caller.
    pub fn attributed(input: EventInput, owner: &AuthenticatedUser) -> Self {
        Self {
            id: input.id,
            title: input.title,
            description: input.description,
            created_by: owner.user_name.clone(),
            created_by_id: owner.user_id.clone(),
        }
    }
}

/// Event fields accepted from the caller. Unknown fields, including any
/// attribution the caller tries to set, are ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventInput {
    #[validate(length(min = 1, max = 256, message = "id must be 1-256 characters"))]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Registration and login payload.
#[derive(Deserialize, Validate)]
pub struct Credentials {
    #[validate(length(min = 1, max = 128, message = "username must be 1-128 characters"))]
    pub username: String,
    /// The 72-byte bcrypt limit is enforced by `password::check_password_length`.
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration response payload.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub username: String,
}

/// Login response payload, for both success and rejection.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub username: String,
    pub token: String,
}
