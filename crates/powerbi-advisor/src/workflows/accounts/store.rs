use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::domain::{UserId, UserIdentity};

/// Document identifier assigned by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-owned document with its ownership and audit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord<T> {
    pub id: RecordId,
    pub user_id: UserId,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: T,
}

impl<T> StoredRecord<T> {
    pub fn is_owned_by(&self, owner: &UserId) -> bool {
        &self.user_id == owner
    }
}

/// User-scoped document collection.
///
/// Writes are stamped with the owner's id and email; `list` and `subscribe`
/// only ever see the owner's documents, newest first.
pub trait RecordStore<T>: Send + Sync {
    fn create(&self, owner: &UserIdentity, payload: T) -> Result<StoredRecord<T>, StoreError>;
    fn update(
        &self,
        owner: &UserIdentity,
        id: &RecordId,
        payload: T,
    ) -> Result<StoredRecord<T>, StoreError>;
    fn delete(&self, owner: &UserIdentity, id: &RecordId) -> Result<(), StoreError>;
    fn list(&self, owner: &UserId) -> Result<Vec<StoredRecord<T>>, StoreError>;
    /// Live view of the owner's documents, republished after every write.
    fn subscribe(&self, owner: &UserId) -> Result<watch::Receiver<Vec<StoredRecord<T>>>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),
    #[error("record {0} belongs to another user")]
    Forbidden(RecordId),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Audit trail entry for a user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user_id: UserId,
    pub user_email: String,
    pub action: String,
    pub page: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl UserActivity {
    pub fn new(user: &UserIdentity, action: &str, page: &str, details: serde_json::Value) -> Self {
        Self {
            user_id: user.uid.clone(),
            user_email: user.email.clone(),
            action: action.to_string(),
            page: page.to_string(),
            details,
            timestamp: Utc::now(),
        }
    }
}

/// Outbound activity log. Callers log failures and carry on.
pub trait ActivityPublisher: Send + Sync {
    fn publish(&self, activity: UserActivity) -> Result<(), ActivityError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivityError {
    #[error("activity log unavailable: {0}")]
    Unavailable(String),
}
