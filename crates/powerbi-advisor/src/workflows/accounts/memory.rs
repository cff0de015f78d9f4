//! Process-local adapters for the account collaborators.
//!
//! They back the development server and the test suites. Passwords are kept
//! as given; nothing here is meant to hold real credentials.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

use super::auth::{normalize_email, AuthError, AuthProvider, MIN_PASSWORD_LENGTH};
use super::domain::{SessionToken, SignUpProfile, UserId, UserIdentity};
use super::store::{
    ActivityError, ActivityPublisher, RecordId, RecordStore, StoreError, StoredRecord,
    UserActivity,
};

struct Account {
    identity: UserIdentity,
    password: String,
}

/// Email/password accounts held in memory.
///
/// Tracks one process-local current user plus any number of bearer sessions,
/// each mapped to the account email it was opened for.
pub struct InMemoryAuthProvider {
    accounts: Mutex<HashMap<String, Account>>,
    sessions: Mutex<HashMap<SessionToken, String>>,
    reset_requests: Mutex<Vec<String>>,
    current: watch::Sender<Option<UserIdentity>>,
    sequence: AtomicU64,
}

impl Default for InMemoryAuthProvider {
    fn default() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
            reset_requests: Mutex::new(Vec::new()),
            current,
            sequence: AtomicU64::new(1),
        }
    }
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails that asked for a password reset, oldest first.
    pub fn reset_requests(&self) -> Vec<String> {
        self.reset_requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn accounts(&self) -> Result<MutexGuard<'_, HashMap<String, Account>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Unavailable("account table lock poisoned".to_string()))
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<SessionToken, String>>, AuthError> {
        self.sessions
            .lock()
            .map_err(|_| AuthError::Unavailable("session table lock poisoned".to_string()))
    }

    fn next_uid(&self) -> UserId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        UserId(format!("user-{id:06}"))
    }
}

impl AuthProvider for InMemoryAuthProvider {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: SignUpProfile,
    ) -> Result<UserIdentity, AuthError> {
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }

        let identity = {
            let mut accounts = self.accounts()?;
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailInUse(email));
            }

            let now = Utc::now();
            let identity = UserIdentity {
                uid: self.next_uid(),
                email: email.clone(),
                display_name: profile.display_name(),
                company: profile.company,
                role: profile.role,
                created_at: now,
                last_login_at: now,
            };
            accounts.insert(
                email,
                Account {
                    identity: identity.clone(),
                    password: password.to_string(),
                },
            );
            identity
        };

        info!(uid = %identity.uid.0, "account created");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<UserIdentity, AuthError> {
        let email = normalize_email(email)?;
        let identity = {
            let mut accounts = self.accounts()?;
            let account = accounts
                .get_mut(&email)
                .filter(|account| account.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            account.identity.last_login_at = Utc::now();
            account.identity.clone()
        };

        info!(uid = %identity.uid.0, "signed in");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(previous) = self.current.send_replace(None) {
            info!(uid = %previous.uid.0, "signed out");
        }
        Ok(())
    }

    fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let email = normalize_email(email)?;
        if !self.accounts()?.contains_key(&email) {
            return Err(AuthError::UnknownAccount(email));
        }

        self.reset_requests
            .lock()
            .map_err(|_| AuthError::Unavailable("reset queue lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }

    fn current_user(&self) -> Option<UserIdentity> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserIdentity>> {
        self.current.subscribe()
    }

    fn open_session(&self, user: &UserIdentity) -> Result<SessionToken, AuthError> {
        if !self.accounts()?.contains_key(&user.email) {
            return Err(AuthError::UnknownAccount(user.email.clone()));
        }

        let token = SessionToken(Uuid::new_v4().simple().to_string());
        self.sessions()?.insert(token.clone(), user.email.clone());
        info!(uid = %user.uid.0, "session opened");
        Ok(token)
    }

    fn session_user(&self, token: &SessionToken) -> Result<UserIdentity, AuthError> {
        let email = self
            .sessions()?
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;
        let identity = self
            .accounts()?
            .get(&email)
            .map(|account| account.identity.clone());
        identity.ok_or(AuthError::InvalidSession)
    }

    fn close_session(&self, token: &SessionToken) -> Result<(), AuthError> {
        self.sessions()?
            .remove(token)
            .ok_or(AuthError::InvalidSession)?;
        info!("session closed");
        Ok(())
    }
}

struct Collection<T> {
    records: Vec<StoredRecord<T>>,
    watchers: HashMap<UserId, watch::Sender<Vec<StoredRecord<T>>>>,
}

/// Record store keeping each collection in a `Vec` behind a mutex.
pub struct InMemoryRecordStore<T> {
    prefix: &'static str,
    sequence: AtomicU64,
    inner: Mutex<Collection<T>>,
}

impl<T> InMemoryRecordStore<T> {
    /// `prefix` starts every generated id, e.g. `calc` gives `calc-000001`.
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            sequence: AtomicU64::new(1),
            inner: Mutex::new(Collection {
                records: Vec::new(),
                watchers: HashMap::new(),
            }),
        }
    }

    fn next_id(&self) -> RecordId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        RecordId(format!("{}-{id:06}", self.prefix))
    }

    #[cfg(test)]
    pub(crate) fn watched_owners(&self) -> usize {
        self.inner
            .lock()
            .map(|collection| collection.watchers.len())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collection<T>>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable(format!("{} store lock poisoned", self.prefix)))
    }
}

impl<T: Clone> Collection<T> {
    fn owned_by(&self, owner: &UserId) -> Vec<StoredRecord<T>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|record| record.is_owned_by(owner))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }

    /// Republishes the owner's list; drops the channel once nobody listens.
    fn notify(&mut self, owner: &UserId) {
        let Some(receivers) = self.watchers.get(owner).map(watch::Sender::receiver_count) else {
            return;
        };
        if receivers == 0 {
            self.watchers.remove(owner);
            return;
        }

        let snapshot = self.owned_by(owner);
        if let Some(sender) = self.watchers.get(owner) {
            sender.send_replace(snapshot);
        }
    }

    fn position(&self, owner: &UserId, id: &RecordId) -> Result<usize, StoreError> {
        let index = self
            .records
            .iter()
            .position(|record| &record.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.records[index].is_owned_by(owner) {
            Ok(index)
        } else {
            Err(StoreError::Forbidden(id.clone()))
        }
    }
}

impl<T> RecordStore<T> for InMemoryRecordStore<T>
where
    T: Clone + Send + Sync,
{
    fn create(&self, owner: &UserIdentity, payload: T) -> Result<StoredRecord<T>, StoreError> {
        let now = Utc::now();
        let record = StoredRecord {
            id: self.next_id(),
            user_id: owner.uid.clone(),
            user_email: owner.email.clone(),
            created_at: now,
            updated_at: now,
            payload,
        };

        let mut collection = self.lock()?;
        collection.records.push(record.clone());
        collection.notify(&owner.uid);
        Ok(record)
    }

    fn update(
        &self,
        owner: &UserIdentity,
        id: &RecordId,
        payload: T,
    ) -> Result<StoredRecord<T>, StoreError> {
        let mut collection = self.lock()?;
        let index = collection.position(&owner.uid, id)?;

        let record = &mut collection.records[index];
        record.payload = payload;
        record.updated_at = Utc::now();
        let updated = record.clone();

        collection.notify(&owner.uid);
        Ok(updated)
    }

    fn delete(&self, owner: &UserIdentity, id: &RecordId) -> Result<(), StoreError> {
        let mut collection = self.lock()?;
        let index = collection.position(&owner.uid, id)?;
        collection.records.remove(index);
        collection.notify(&owner.uid);
        Ok(())
    }

    fn list(&self, owner: &UserId) -> Result<Vec<StoredRecord<T>>, StoreError> {
        Ok(self.lock()?.owned_by(owner))
    }

    fn subscribe(&self, owner: &UserId) -> Result<watch::Receiver<Vec<StoredRecord<T>>>, StoreError> {
        let mut collection = self.lock()?;
        if let Some(sender) = collection.watchers.get(owner) {
            return Ok(sender.subscribe());
        }

        let (sender, receiver) = watch::channel(collection.owned_by(owner));
        collection.watchers.insert(owner.clone(), sender);
        Ok(receiver)
    }
}

/// Activity log collecting entries in memory.
#[derive(Default, Clone)]
pub struct InMemoryActivityLog {
    entries: Arc<Mutex<Vec<UserActivity>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<UserActivity> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ActivityPublisher for InMemoryActivityLog {
    fn publish(&self, activity: UserActivity) -> Result<(), ActivityError> {
        self.entries
            .lock()
            .map_err(|_| ActivityError::Unavailable("activity log lock poisoned".to_string()))?
            .push(activity);
        Ok(())
    }
}
