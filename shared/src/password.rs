//! Password hashing with bcrypt.

use tracing::error;

use crate::{Error, Result};

/// bcrypt only reads this many bytes of input; anything longer is rejected
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Reject passwords bcrypt would truncate. Counts bytes, not characters.
pub fn check_password_length(password: &str) -> Result<()> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(Error::Invalid(format!(
            "Invalid request body: password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

/// Hash a password using bcrypt with the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    check_password_length(password)?;
    bcrypt::hash(password, cost).map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a bcrypt hash.
///
/// A malformed stored hash, or a password longer than bcrypt accepts, counts
/// as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if check_password_length(password).is_err() {
        return false;
    }

    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            error!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

/// A throwaway hash at the configured cost. Logins for unknown users verify
/// against it so they cost the same bcrypt work as a wrong password.
///
/// Built once with the rest of the process state, never on a request path.
#[derive(Clone)]
pub struct DummyHash(String);

impl DummyHash {
    pub fn new(cost: u32) -> Result<Self> {
        hash_password("dummy-password-for-timing", cost).map(Self)
    }

    /// Always false; only the work matters.
    pub fn verify(&self, password: &str) -> bool {
        let _ = bcrypt::verify(password, &self.0);
        false
    }
}
