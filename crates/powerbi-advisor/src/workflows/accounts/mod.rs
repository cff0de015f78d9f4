//! Sign-in state and per-user document storage.
//!
//! The hosted identity and document services sit behind [`AuthProvider`],
//! [`RecordStore`] and [`ActivityPublisher`]; the `memory` adapters serve the
//! development server and tests.

pub mod auth;
pub mod domain;
pub mod memory;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use auth::{normalize_email, AuthError, AuthProvider, MIN_PASSWORD_LENGTH};
pub use domain::{SessionToken, SignUpProfile, UserId, UserIdentity};
pub use memory::{InMemoryActivityLog, InMemoryAuthProvider, InMemoryRecordStore};
pub use router::auth_router;
pub use store::{
    ActivityError, ActivityPublisher, RecordId, RecordStore, StoreError, StoredRecord,
    UserActivity,
};
