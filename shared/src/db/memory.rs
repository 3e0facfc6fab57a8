use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CredentialStore, RecordStore};
use crate::models::{Event, User};
use crate::{Error, Result};

/// In-memory credential store for tests and local runs.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(Error::Conflict("Username already registered.".to_string()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }
}

/// In-memory event store. Scans return events ordered by id.
#[derive(Default)]
pub struct MemoryRecordStore {
    events: RwLock<BTreeMap<String, Event>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn put_event(&self, event: &Event) -> Result<()> {
        self.events.write().await.insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        Ok(self.events.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate() {
        let store = MemoryCredentialStore::new();
        store.create_user(&user("1", "alice")).await.unwrap();

        let err = store.create_user(&user("2", "alice")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(store.get_user("alice").await.unwrap().unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_put_event_replaces() {
        let store = MemoryRecordStore::new();
        let mut event = Event {
            id: "e1".to_string(),
            title: "first".to_string(),
            description: String::new(),
            created_by: "alice".to_string(),
            created_by_id: "1".to_string(),
        };
        store.put_event(&event).await.unwrap();
        event.title = "second".to_string();
        store.put_event(&event).await.unwrap();

        assert_eq!(store.get_event("e1").await.unwrap().unwrap().title, "second");
        assert_eq!(store.list_events().await.unwrap().len(), 1);
        assert!(store.get_event("missing").await.unwrap().is_none());
    }
}
