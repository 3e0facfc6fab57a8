//! Configuration management for Lambda functions.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Longest accepted session lifetime (one week).
pub const MAX_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600;

/// Secret name used when `JWT_SECRET_ID` is not set.
pub const DEFAULT_JWT_SECRET_ID: &str = "JWTUserTokenSecret";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential table, keyed by username
    pub user_table: String,
    /// Event table, keyed by id
    pub event_table: String,
    /// Name of the secret holding `{"jwt_secret": ...}`
    pub jwt_secret_id: String,
    /// Session token lifetime
    pub token_ttl: Duration,
    /// bcrypt cost factor
    pub password_hash_cost: u32,
    /// How long a fetched secret may be reused; zero disables caching
    pub secret_cache_ttl: Duration,
    /// AWS region
    pub aws_region: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| Error::Config(format!("{} not set", key)))
        };

        let event_table = match lookup("EVENT_TABLE") {
            Some(table) => table,
            None => required("SAMPLE_TABLE")
                .map_err(|_| Error::Config("EVENT_TABLE not set".to_string()))?,
        };

        let password_hash_cost = parse_or(&lookup, "PASSWORD_HASH_COST", 8u32)?;
        if !(4..=31).contains(&password_hash_cost) {
            return Err(Error::Config(format!(
                "PASSWORD_HASH_COST must be between 4 and 31, got {}",
                password_hash_cost
            )));
        }

        let token_ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", 3600u64)?;
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&token_ttl_secs) {
            return Err(Error::Config(format!(
                "TOKEN_TTL_SECS must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS, token_ttl_secs
            )));
        }

        Ok(Self {
            user_table: required("USER_TABLE")?,
            event_table,
            jwt_secret_id: lookup("JWT_SECRET_ID")
                .unwrap_or_else(|| DEFAULT_JWT_SECRET_ID.to_string()),
            token_ttl: Duration::from_secs(token_ttl_secs),
            password_hash_cost,
            secret_cache_ttl: Duration::from_secs(parse_or(&lookup, "SECRET_CACHE_TTL_SECS", 0u64)?),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
