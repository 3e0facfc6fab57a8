//! `POST /users`: create a credential record.

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, Response};
use shared::http::{json_response, parse_json_body, require_method};
use shared::password::hash_password;
use shared::{Credentials, RegisterResponse, User};
use tracing::info;

use super::{finish, log_request};
use crate::AppState;

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    log_request(&event);
    let result = register(state, &event).await;
    Ok(finish(&event, result))
}

async fn register(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    require_method(event, Method::POST)?;

    let credentials: Credentials = parse_json_body(event.body())?;
    let password_hash = hash_password(&credentials.password, state.config.password_hash_cost)?;
    let user = User::new(credentials.username, password_hash);

    state.users.create_user(&user).await?;
    info!(user_id = %user.id, "Registered user {}", user.username);

    json_response(
        201,
        &RegisterResponse {
            message: "Registration successful. Proceed to login".to_string(),
            username: user.username,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{body_json, request, state};
    use shared::password::verify_password;

    fn register_request(username: &str, password: &str) -> Request {
        request(
            "POST",
            "/users",
            Body::from(serde_json::json!({ "username": username, "password": password }).to_string()),
        )
    }

    #[tokio::test]
    async fn test_register_creates_user() {
        let state = state();
        let response = handle(&state, register_request("alice", "hunter2")).await.unwrap();

        assert_eq!(response.status(), 201);
        let body = body_json(&response);
        assert_eq!(body["message"], "Registration successful. Proceed to login");
        assert_eq!(body["username"], "alice");
        assert!(body.get("passwordHash").is_none());
        assert!(!std::str::from_utf8(response.body().as_ref()).unwrap().contains("$2"));

        let stored = state.users.get_user("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "hunter2");
        assert!(verify_password("hunter2", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let state = state();
        handle(&state, register_request("alice", "first")).await.unwrap();
        let original_id = state.users.get_user("alice").await.unwrap().unwrap().id;

        let response = handle(&state, register_request("alice", "second")).await.unwrap();
        assert_eq!(response.status(), 409);

        let stored = state.users.get_user("alice").await.unwrap().unwrap();
        assert_eq!(stored.id, original_id);
        assert!(verify_password("first", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_invalid_body_rejected() {
        let state = state();

        let response = handle(&state, request("POST", "/users", Body::from("not json")))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);

        let response = handle(&state, register_request("", "pw")).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_multibyte_password_over_byte_limit_rejected() {
        let state = state();
        // 55 characters but 91 bytes; bcrypt would only read the first 72.
        let password = format!("{}correct-secret-tail", "é".repeat(36));

        let response = handle(&state, register_request("alice", &password)).await.unwrap();
        assert_eq!(response.status(), 400);
        assert!(state.users.get_user("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let state = state();
        let response = handle(&state, request("GET", "/users", Body::Empty)).await.unwrap();
        assert_eq!(response.status(), 405);
    }
}
