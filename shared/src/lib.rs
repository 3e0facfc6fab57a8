//! Shared library for the Event API Lambda functions.
//!
//! This crate provides the error taxonomy, configuration, secret access,
//! password hashing, session tokens, store interfaces and HTTP helpers used
//! by every handler.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod password;
pub mod secrets;

pub use auth::{bearer_token, issue_token, sign_claims, verify_token, AuthenticatedUser, Authenticator, SessionClaims};
pub use config::Config;
pub use db::{CredentialStore, RecordStore};
pub use error::{Error, Result};
pub use models::{Credentials, Event, EventInput, LoginResponse, RegisterResponse, User};
pub use secrets::{get_jwt_secret, CachingSecretProvider, JwtSecret, SecretProvider, SecretsManagerProvider, StaticSecretProvider};
