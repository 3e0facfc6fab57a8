use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use tracing::{info, warn};

use super::{CredentialStore, RecordStore};
use crate::models::{Event, User};
use crate::{Error, Result};

type Item = HashMap<String, AttributeValue>;

fn string_attr(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

/// Credential table in DynamoDB, partition key `username`.
#[derive(Clone)]
pub struct DynamoCredentialStore {
    client: DynamoClient,
    table: String,
}

impl DynamoCredentialStore {
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

fn user_from_item(item: &Item) -> Result<User> {
    let malformed = |field: &str| Error::Internal(format!("User record is missing {}", field));

    Ok(User {
        id: string_attr(item, "id").ok_or_else(|| malformed("id"))?,
        username: string_attr(item, "username").ok_or_else(|| malformed("username"))?,
        password_hash: string_attr(item, "passwordHash").ok_or_else(|| malformed("passwordHash"))?,
    })
}

#[async_trait]
impl CredentialStore for DynamoCredentialStore {
    async fn get_user(&self, username: &str) -> Result<Option<User>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("username", AttributeValue::S(username.to_string()))
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Failed to get user: {}", e)))?;

        output.item().map(user_from_item).transpose()
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item("id", AttributeValue::S(user.id.clone()))
            .item("username", AttributeValue::S(user.username.clone()))
            .item("passwordHash", AttributeValue::S(user.password_hash.clone()))
            .condition_expression("attribute_not_exists(username)")
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                if service_error.is_conditional_check_failed_exception() {
                    Error::Conflict("Username already registered.".to_string())
                } else {
                    Error::Unavailable(format!("Failed to create user: {}", service_error))
                }
            })?;

        info!(user_id = %user.id, "User record created");
        Ok(())
    }
}

/// Event table in DynamoDB, partition key `id`.
#[derive(Clone)]
pub struct DynamoRecordStore {
    client: DynamoClient,
    table: String,
}

impl DynamoRecordStore {
    pub fn new(client: DynamoClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

fn event_from_item(item: &Item) -> Result<Event> {
    let id = string_attr(item, "id")
        .ok_or_else(|| Error::Internal("Event record is missing id".to_string()))?;

    Ok(Event {
        id,
        title: string_attr(item, "title").unwrap_or_default(),
        description: string_attr(item, "description").unwrap_or_default(),
        created_by: string_attr(item, "createdBy").unwrap_or_default(),
        created_by_id: string_attr(item, "createdById").unwrap_or_default(),
    })
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_event(&self, event: &Event) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .item("id", AttributeValue::S(event.id.clone()))
            .item("title", AttributeValue::S(event.title.clone()))
            .item("description", AttributeValue::S(event.description.clone()))
            .item("createdBy", AttributeValue::S(event.created_by.clone()))
            .item("createdById", AttributeValue::S(event.created_by_id.clone()))
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Failed to put event: {}", e)))?;

        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(id.to_string()))
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Failed to get event: {}", e)))?;

        output.item().map(event_from_item).transpose()
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let output = self
            .client
            .scan()
            .table_name(&self.table)
            .send()
            .await
            .map_err(|e| Error::Unavailable(format!("Failed to scan events: {}", e)))?;

        if output.last_evaluated_key().is_some() {
            warn!(table = %self.table, "Event scan truncated to first page");
        }

        output.items().iter().map(event_from_item).collect()
    }
}
