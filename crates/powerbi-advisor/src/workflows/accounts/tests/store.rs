use super::common::*;
use crate::workflows::accounts::{
    ActivityPublisher, InMemoryActivityLog, InMemoryRecordStore, RecordId, RecordStore,
    StoreError, UserActivity,
};
use serde_json::json;

#[test]
fn create_stamps_owner_and_timestamps() {
    let store = InMemoryRecordStore::new("calc");
    let owner = identity("user-1", "dana@contoso.com");

    let record = store.create(&owner, note("first")).expect("create succeeds");

    assert!(record.id.0.starts_with("calc-"));
    assert_eq!(record.user_id, owner.uid);
    assert_eq!(record.user_email, "dana@contoso.com");
    assert_eq!(record.created_at, record.updated_at);
}

#[test]
fn list_is_scoped_to_owner_and_newest_first() {
    let store = InMemoryRecordStore::new("calc");
    let dana = identity("user-1", "dana@contoso.com");
    let lee = identity("user-2", "lee@contoso.com");

    let first = store.create(&dana, note("first")).expect("create");
    let second = store.create(&dana, note("second")).expect("create");
    store.create(&lee, note("other")).expect("create");

    let listed = store.list(&dana.uid).expect("list succeeds");
    let ids: Vec<_> = listed.iter().map(|record| record.id.clone()).collect();

    assert_eq!(ids, vec![second.id, first.id]);
    assert!(listed.iter().all(|record| record.user_id == dana.uid));
}

#[test]
fn update_replaces_payload_and_bumps_updated_at() {
    let store = InMemoryRecordStore::new("calc");
    let owner = identity("user-1", "dana@contoso.com");
    let created = store.create(&owner, note("draft")).expect("create");

    let updated = store
        .update(&owner, &created.id, note("final"))
        .expect("update succeeds");

    assert_eq!(updated.payload, note("final"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn foreign_and_missing_records_are_rejected() {
    let store = InMemoryRecordStore::new("calc");
    let dana = identity("user-1", "dana@contoso.com");
    let lee = identity("user-2", "lee@contoso.com");
    let record = store.create(&dana, note("private")).expect("create");

    assert_eq!(
        store.update(&lee, &record.id, note("hijack")),
        Err(StoreError::Forbidden(record.id.clone()))
    );
    assert_eq!(
        store.delete(&lee, &record.id),
        Err(StoreError::Forbidden(record.id.clone()))
    );

    let missing = RecordId("calc-999999".to_string());
    assert_eq!(
        store.delete(&dana, &missing),
        Err(StoreError::NotFound(missing))
    );
}

#[test]
fn delete_removes_record() {
    let store = InMemoryRecordStore::new("calc");
    let owner = identity("user-1", "dana@contoso.com");
    let record = store.create(&owner, note("temporary")).expect("create");

    store.delete(&owner, &record.id).expect("delete succeeds");

    assert!(store.list(&owner.uid).expect("list").is_empty());
}

#[test]
fn stored_records_flatten_payload_beside_metadata() {
    let store = InMemoryRecordStore::new("deck");
    let owner = identity("user-1", "dana@contoso.com");
    let record = store.create(&owner, note("flattened")).expect("create");

    let value = serde_json::to_value(&record).expect("serializes");

    assert_eq!(value["title"], json!("flattened"));
    assert_eq!(value["userId"], json!("user-1"));
    assert_eq!(value["userEmail"], json!("dana@contoso.com"));
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("payload").is_none());
}

#[tokio::test]
async fn subscribers_receive_owner_snapshots() {
    let store = InMemoryRecordStore::new("calc");
    let dana = identity("user-1", "dana@contoso.com");
    let lee = identity("user-2", "lee@contoso.com");

    let mut receiver = store.subscribe(&dana.uid).expect("subscribe");
    assert!(receiver.borrow_and_update().is_empty());

    store.create(&lee, note("other")).expect("create");
    assert!(!receiver.has_changed().expect("sender alive"));

    let record = store.create(&dana, note("mine")).expect("create");
    receiver.changed().await.expect("snapshot published");
    let snapshot = receiver.borrow_and_update().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, record.id);
}

#[tokio::test]
async fn dropped_subscribers_release_their_channel() {
    let store = InMemoryRecordStore::new("calc");
    let dana = identity("user-1", "dana@contoso.com");
    let lee = identity("user-2", "lee@contoso.com");

    let mut kept = store.subscribe(&dana.uid).expect("subscribe");
    let dropped = store.subscribe(&lee.uid).expect("subscribe");
    assert_eq!(store.watched_owners(), 2);
    drop(dropped);

    store.create(&lee, note("unwatched")).expect("create");
    assert_eq!(store.watched_owners(), 1);

    store.create(&dana, note("watched")).expect("create");
    assert_eq!(store.watched_owners(), 1);
    kept.changed().await.expect("snapshot published");
    assert_eq!(kept.borrow_and_update().len(), 1);

    drop(kept);
    store.create(&dana, note("after drop")).expect("create");
    assert_eq!(store.watched_owners(), 0);

    let mut fresh = store.subscribe(&dana.uid).expect("resubscribe");
    assert_eq!(fresh.borrow_and_update().len(), 2);
}

#[test]
fn activity_log_keeps_entries_in_order() {
    let log = InMemoryActivityLog::new();
    let owner = identity("user-1", "dana@contoso.com");

    log.publish(UserActivity::new(
        &owner,
        "calculation_saved",
        "calculator",
        json!({"id": "calc-000001"}),
    ))
    .expect("publish succeeds");
    log.publish(UserActivity::new(&owner, "report_exported", "calculator", json!({})))
        .expect("publish succeeds");

    let actions: Vec<_> = log
        .entries()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    assert_eq!(actions, vec!["calculation_saved", "report_exported"]);
}
