//! Credential and record store interfaces.
//!
//! Both stores are addressed by primary key only: point get, point put and a
//! full scan. Handlers receive them as trait objects so the DynamoDB
//! implementations can be swapped for the in-memory ones in tests.

mod dynamo;
mod memory;

use async_trait::async_trait;

use crate::models::{Event, User};
use crate::Result;

pub use dynamo::{DynamoCredentialStore, DynamoRecordStore};
pub use memory::{MemoryCredentialStore, MemoryRecordStore};

/// Users keyed by username.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by username.
    async fn get_user(&self, username: &str) -> Result<Option<User>>;

    /// Store a new user. Fails with `Error::Conflict` if the username is taken.
    async fn create_user(&self, user: &User) -> Result<()>;
}

/// Event records keyed by id.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create or fully replace an event.
    async fn put_event(&self, event: &Event) -> Result<()>;

    /// Point lookup by id.
    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    /// Return the first page of a table scan.
    async fn list_events(&self) -> Result<Vec<Event>>;
}
