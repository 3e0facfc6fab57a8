//! Application state shared by every invocation of a Lambda process.

use std::sync::Arc;

use shared::db::{DynamoCredentialStore, DynamoRecordStore};
use shared::password::DummyHash;
use shared::{
    Authenticator, CachingSecretProvider, Config, CredentialStore, RecordStore, SecretProvider,
    SecretsManagerProvider,
};
use tracing::info;

/// Collaborators injected into handlers.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn CredentialStore>,
    pub events: Arc<dyn RecordStore>,
    pub auth: Authenticator,
    pub dummy_hash: DummyHash,
}

impl AppState {
    pub fn new(
        config: Config,
        users: Arc<dyn CredentialStore>,
        events: Arc<dyn RecordStore>,
        secrets: Arc<dyn SecretProvider>,
    ) -> shared::Result<Self> {
        let auth = Authenticator::new(secrets, config.jwt_secret_id.clone(), config.token_ttl);
        let dummy_hash = DummyHash::new(config.password_hash_cost)?;
        Ok(Self {
            config,
            users,
            events,
            auth,
            dummy_hash,
        })
    }

    /// Build state backed by DynamoDB and Secrets Manager.
    pub async fn from_env() -> Result<Self, lambda_http::Error> {
        let config = Config::from_env()?;

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;
        let dynamo = aws_sdk_dynamodb::Client::new(&aws_config);
        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

        info!(
            "Initialised state: user_table={}, event_table={}, region={}",
            config.user_table, config.event_table, config.aws_region
        );

        let users = Arc::new(DynamoCredentialStore::new(dynamo.clone(), config.user_table.clone()));
        let events = Arc::new(DynamoRecordStore::new(dynamo, config.event_table.clone()));
        let secrets = Arc::new(CachingSecretProvider::new(
            SecretsManagerProvider::new(secrets_client),
            config.secret_cache_ttl,
        ));

        Ok(Self::new(config, users, events, secrets)?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use lambda_http::http::header::AUTHORIZATION;
    use lambda_http::{Body, Request};
    use shared::db::{MemoryCredentialStore, MemoryRecordStore};
    use shared::StaticSecretProvider;

    pub const SECRET: &str = "unit-test-secret";

    pub fn config() -> Config {
        Config::from_lookup(|key| match key {
            "USER_TABLE" => Some("users".to_string()),
            "EVENT_TABLE" => Some("events".to_string()),
            "PASSWORD_HASH_COST" => Some("4".to_string()),
            _ => None,
        })
        .unwrap()
    }

    pub fn state() -> AppState {
        let secrets = StaticSecretProvider::new()
            .with_secret("JWTUserTokenSecret", format!(r#"{{"jwt_secret":"{}"}}"#, SECRET));

        AppState::new(
            config(),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(secrets),
        )
        .unwrap()
    }

    pub fn request(method: &str, uri: &str, body: Body) -> Request {
        lambda_http::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap()
    }

    pub fn authed_request(method: &str, uri: &str, token: &str, body: Body) -> Request {
        let mut request = request(method, uri, body);
        request
            .headers_mut()
            .insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        request
    }

    pub fn body_json(response: &lambda_http::Response<Body>) -> serde_json::Value {
        serde_json::from_slice(response.body().as_ref()).unwrap()
    }
}
