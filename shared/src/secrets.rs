//! AWS Secrets Manager integration.

use async_trait::async_trait;
use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Error, Result};

/// Source of named secret strings.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the raw string value of a secret.
    async fn get_secret(&self, secret_id: &str) -> Result<String>;
}

/// Secrets Manager backed provider.
#[derive(Clone)]
pub struct SecretsManagerProvider {
    client: SecretsClient,
}

impl SecretsManagerProvider {
    pub fn new(client: SecretsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretProvider for SecretsManagerProvider {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Failed to get secret: {}", e)))?;

        response
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| Error::Config("Secret has no string value".to_string()))
    }
}

/// Fixed in-process secrets, for tests and local runs.
#[derive(Debug, Default, Clone)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, secret_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(secret_id.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretProvider for StaticSecretProvider {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| Error::Unavailable(format!("Secret {} not found", secret_id)))
    }
}

/// Wraps a provider with a time-bounded cache.
///
/// A zero TTL disables caching and every call goes to the inner provider.
pub struct CachingSecretProvider<P> {
    inner: P,
    ttl: Duration,
    cache: RwLock<HashMap<String, (String, Instant)>>,
}

impl<P: SecretProvider> CachingSecretProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Drop every cached value (useful after a secret rotation).
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl<P: SecretProvider> SecretProvider for CachingSecretProvider<P> {
    async fn get_secret(&self, secret_id: &str) -> Result<String> {
        if self.ttl.is_zero() {
            return self.inner.get_secret(secret_id).await;
        }

        // Check cache first
        {
            let cache = self.cache.read().await;
            if let Some((value, fetched_at)) = cache.get(secret_id) {
                if fetched_at.elapsed() < self.ttl {
                    debug!(secret_id, "Secret served from cache");
                    return Ok(value.clone());
                }
            }
        }

        let value = self.inner.get_secret(secret_id).await?;

        {
            let mut cache = self.cache.write().await;
            cache.insert(secret_id.to_string(), (value.clone(), Instant::now()));
        }

        Ok(value)
    }
}

/// Shape of the token signing secret.
#[derive(Deserialize)]
pub struct JwtSecret {
    pub jwt_secret: String,
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSecret").field("jwt_secret", &"<redacted>").finish()
    }
}

/// Fetch and parse the token signing secret.
pub async fn get_jwt_secret(provider: &dyn SecretProvider, secret_id: &str) -> Result<JwtSecret> {
    let secret_string = provider.get_secret(secret_id).await?;

    let secret: JwtSecret = serde_json::from_str(&secret_string)
        .map_err(|e| Error::Config(format!("Failed to parse signing secret: {}", e)))?;

    if secret.jwt_secret.is_empty() {
        return Err(Error::Config("Signing secret is empty".to_string()));
    }

    Ok(secret)
}
