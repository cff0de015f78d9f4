use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::accounts::{
    ActivityError, ActivityPublisher, InMemoryActivityLog, InMemoryRecordStore, UserActivity,
    UserId, UserIdentity,
};
use crate::workflows::export::ReportMetadata;
use crate::workflows::pitch_deck::{PitchDeckPayload, PitchDeckService, PitchResponses};

pub(super) type MemoryPitchDecks = InMemoryRecordStore<PitchDeckPayload>;

/// Every required question answered, plus one optional one.
pub(super) fn complete_responses() -> PitchResponses {
    PitchResponses::new()
        .with_text("company_name", "Fabrikam")
        .with_text("industry", "healthcare")
        .with_text("company_size", "201-500")
        .with_choices("biggest_challenge", &["data_silos", "manual_reporting"])
        .with_choices("current_tools", &["excel"])
        .with_text("pain_points", "16-30")
        .with_choices("data_sources", &["sql_server", "sharepoint"])
        .with_text("data_volume", "medium")
        .with_text("update_frequency", "daily")
        .with_choices("key_metrics", &["revenue"])
        .with_choices("user_types", &["executives", "analysts"])
        .with_choices("reporting_needs", &["executive_dashboards"])
        .with_text("timeline", "6-12-months")
        .with_choices("success_criteria", &["time_savings"])
        .with_text("it_support", "limited")
        .with_text("budget_range", "50k-100k")
}

pub(super) fn user(uid: &str) -> UserIdentity {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    UserIdentity {
        uid: UserId(uid.to_string()),
        email: format!("{uid}@fabrikam.com"),
        display_name: None,
        company: "Fabrikam".to_string(),
        role: "Director".to_string(),
        created_at: at,
        last_login_at: at,
    }
}

pub(super) fn fixed_metadata() -> ReportMetadata {
    let at = Utc
        .timestamp_millis_opt(1_717_243_200_250)
        .single()
        .expect("valid timestamp");
    ReportMetadata::at(at)
}

pub(super) fn build_service() -> (
    PitchDeckService<MemoryPitchDecks, InMemoryActivityLog>,
    Arc<MemoryPitchDecks>,
    Arc<InMemoryActivityLog>,
) {
    let store = Arc::new(InMemoryRecordStore::new("pitch"));
    let activity = Arc::new(InMemoryActivityLog::new());
    let service = PitchDeckService::new(store.clone(), activity.clone());
    (service, store, activity)
}

pub(super) struct FailingActivity;

impl ActivityPublisher for FailingActivity {
    fn publish(&self, _activity: UserActivity) -> Result<(), ActivityError> {
        Err(ActivityError::Unavailable("activity sink offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
