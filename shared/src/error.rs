//! Error types for the Event API Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Event API Lambda functions.
///
/// Every handler funnels its failures through this enum so that equivalent
/// failures map to the same status code and the same public message. The
/// payload strings are for logs; only [`Error::public_message`] reaches callers.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or invalid request input
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// Missing, malformed, badly signed or expired bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login rejected (unknown user or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Not found error
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP method not accepted by the handler
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Write rejected because the key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backing store or secret provider failure
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Invalid(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::InvalidCredentials => 403,
            Error::NotFound(_) => 404,
            Error::MethodNotAllowed(_) => 405,
            Error::Conflict(_) => 409,
            Error::Unavailable(_) => 503,
            Error::Config(_) | Error::Serialization(_) | Error::Internal(_) => 500,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Error::Invalid(msg) | Error::NotFound(msg) | Error::Conflict(msg) => msg.clone(),
            Error::Unauthorized(_) => "Authorization token missing, invalid or expired.".to_string(),
            Error::InvalidCredentials => "Invalid username or password.".to_string(),
            Error::MethodNotAllowed(method) => format!("Method {} not allowed.", method),
            Error::Unavailable(_) => "Service temporarily unavailable.".to_string(),
            Error::Config(_) | Error::Serialization(_) | Error::Internal(_) => {
                "Internal server error.".to_string()
            }
        }
    }
}
