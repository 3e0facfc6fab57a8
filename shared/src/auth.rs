//! Session token issuance and the request authorization gate.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lambda_http::http::header::AUTHORIZATION;
use lambda_http::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::secrets::{get_jwt_secret, SecretProvider};
use crate::{Error, Result};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// User id (UUID string)
    pub user_id: String,
    /// Username
    pub user_name: String,
    /// Issued at
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Identity proven by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub user_name: String,
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            user_name: claims.user_name,
        }
    }
}

/// Sign a session token for a user, valid for `ttl` from now.
pub fn issue_token(user_id: &str, user_name: &str, secret: &str, ttl: Duration) -> Result<String> {
    let now = Utc::now().timestamp();
    let exp = i64::try_from(ttl.as_secs())
        .ok()
        .and_then(|secs| now.checked_add(secs))
        .ok_or_else(|| Error::Config(format!("Token lifetime {}s is out of range", ttl.as_secs())))?;

    let claims = SessionClaims {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        iat: now,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    sign_claims(&claims, secret)
}

/// Sign an explicit set of claims.
pub fn sign_claims(claims: &SessionClaims, secret: &str) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a token's signature and expiry and return the identity it carries.
pub fn verify_token(token: &str, secret: &str) -> Result<AuthenticatedUser> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::Unauthorized("Token expired".to_string()),
        _ => Error::Unauthorized(format!("Failed to decode token: {}", e)),
    })?;

    Ok(token_data.claims.into())
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized("Authorization header missing".to_string()))?
        .to_str()
        .map_err(|_| Error::Unauthorized("Authorization header is not valid text".to_string()))?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::Unauthorized("Authorization header is not a bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::Unauthorized(format!("Unsupported authorization scheme {}", scheme)));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Unauthorized("Bearer token is empty".to_string()));
    }

    Ok(token)
}

/// Issues session tokens and gates protected handlers.
///
/// The signing secret is fetched from the provider on every call, so a
/// rotated secret takes effect as soon as the provider returns it. Tokens
/// are not revocable: rotating the secret invalidates all of them at once,
/// otherwise they live until `exp`.
#[derive(Clone)]
pub struct Authenticator {
    secrets: Arc<dyn SecretProvider>,
    secret_id: String,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(secrets: Arc<dyn SecretProvider>, secret_id: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            secrets,
            secret_id: secret_id.into(),
            token_ttl,
        }
    }

    /// Sign a fresh session token for a user.
    pub async fn issue(&self, user_id: &str, user_name: &str) -> Result<String> {
        let secret = get_jwt_secret(self.secrets.as_ref(), &self.secret_id).await?;
        issue_token(user_id, user_name, &secret.jwt_secret, self.token_ttl)
    }

    /// Authorize a request from its headers.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser> {
        let token = bearer_token(headers)?;
        let secret = get_jwt_secret(self.secrets.as_ref(), &self.secret_id).await?;
        let user = verify_token(token, &secret.jwt_secret)?;

        debug!(user_id = %user.user_id, "Request authenticated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::StaticSecretProvider;
    use lambda_http::http::HeaderValue;

    const SECRET: &str = "test-signing-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn authenticator(secret: &str) -> Authenticator {
        let provider = StaticSecretProvider::new()
            .with_secret("JWTUserTokenSecret", format!(r#"{{"jwt_secret":"{}"}}"#, secret));
        Authenticator::new(Arc::new(provider), "JWTUserTokenSecret", Duration::from_secs(3600))
    }

    #[test]
    fn test_issue_and_verify() {
        let token = issue_token("user-1", "alice", SECRET, Duration::from_secs(3600)).unwrap();
        let user = verify_token(&token, SECRET).unwrap();
        assert_eq!(
            user,
            AuthenticatedUser {
                user_id: "user-1".to_string(),
                user_name: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_claims_use_camel_case() {
        let claims = SessionClaims {
            user_id: "user-1".to_string(),
            user_name: "alice".to_string(),
            iat: 0,
            exp: 1,
            jti: "j".to_string(),
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["userName"], "alice");
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: "user-1".to_string(),
            user_name: "alice".to_string(),
            iat: now - 7200,
            exp: now - 5,
            jti: Uuid::new_v4().to_string(),
        };
        let token = sign_claims(&claims, SECRET).unwrap();

        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(msg) if msg == "Token expired"));
    }

    #[test]
    fn test_oversized_ttl_is_error() {
        let err = issue_token("user-1", "alice", SECRET, Duration::from_secs(u64::MAX)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = issue_token("user-1", "alice", SECRET, Duration::from_secs(i64::MAX as u64)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("user-1", "alice", SECRET, Duration::from_secs(3600)).unwrap();
        assert!(matches!(verify_token(&token, "other-secret"), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = issue_token("user-1", "alice", SECRET, Duration::from_secs(3600)).unwrap();
        let forged = issue_token("user-2", "mallory", "attacker", Duration::from_secs(3600)).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(matches!(verify_token(&parts.join("."), SECRET), Err(Error::Unauthorized(_))));
        assert!(matches!(verify_token("garbage", SECRET), Err(Error::Unauthorized(_))));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(&headers_with("bearer  abc")).unwrap(), "abc");

        assert!(matches!(bearer_token(&HeaderMap::new()), Err(Error::Unauthorized(_))));
        assert!(matches!(bearer_token(&headers_with("Basic abc")), Err(Error::Unauthorized(_))));
        assert!(matches!(bearer_token(&headers_with("Bearer")), Err(Error::Unauthorized(_))));
        assert!(matches!(bearer_token(&headers_with("Bearer   ")), Err(Error::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_authenticator_round_trip() {
        let auth = authenticator(SECRET);
        let token = auth.issue("user-1", "alice").await.unwrap();

        let user = auth
            .authenticate(&headers_with(&format!("Bearer {}", token)))
            .await
            .unwrap();
        assert_eq!(user.user_name, "alice");
    }

    #[tokio::test]
    async fn test_rotated_secret_invalidates_tokens() {
        let token = authenticator("old-secret").issue("user-1", "alice").await.unwrap();

        let err = authenticator("new-secret")
            .authenticate(&headers_with(&format!("Bearer {}", token)))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
