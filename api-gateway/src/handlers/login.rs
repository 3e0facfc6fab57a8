//! `POST /login`: exchange credentials for a session token.

use lambda_http::http::Method;
use lambda_http::{Body, Error, Request, Response};
use shared::http::{json_response, parse_json_body, require_method};
use shared::password::{check_password_length, verify_password};
use shared::{Credentials, LoginResponse, User};
use tracing::info;

use super::{finish, log_request};
use crate::AppState;

/// Token value returned alongside a rejected login.
pub const REJECTED_TOKEN: &str = "NOT OKAY";

pub async fn handle(state: &AppState, event: Request) -> Result<Response<Body>, Error> {
    log_request(&event);
    let result = login(state, &event).await;
    Ok(finish(&event, result))
}

async fn login(state: &AppState, event: &Request) -> shared::Result<Response<Body>> {
    require_method(event, Method::POST)?;

    let credentials: Credentials = parse_json_body(event.body())?;

    let user = match check_credentials(state, &credentials).await? {
        Some(user) => user,
        None => {
            info!("Login rejected for {}", credentials.username);
            return json_response(
                shared::Error::InvalidCredentials.status_code(),
                &LoginResponse {
                    message: shared::Error::InvalidCredentials.public_message(),
                    username: credentials.username,
                    token: REJECTED_TOKEN.to_string(),
                },
            );
        }
    };

    let token = state.auth.issue(&user.id, &user.username).await?;
    info!(user_id = %user.id, "Login successful for {}", user.username);

    json_response(
        200,
        &LoginResponse {
            message: "Login successful.".to_string(),
            username: user.username,
            token,
        },
    )
}

/// Returns the user only if the password matches. Unknown usernames cost the
/// same bcrypt work as a wrong password.
async fn check_credentials(state: &AppState, credentials: &Credentials) -> shared::Result<Option<User>> {
    // Over-long passwords never match; reject before the lookup so the
    // outcome does not depend on whether the user exists.
    if check_password_length(&credentials.password).is_err() {
        return Ok(None);
    }

    match state.users.get_user(&credentials.username).await? {
        Some(user) if verify_password(&credentials.password, &user.password_hash) => Ok(Some(user)),
        Some(_) => Ok(None),
        None => {
            state.dummy_hash.verify(&credentials.password);
            Ok(None)
        }
    }
}
