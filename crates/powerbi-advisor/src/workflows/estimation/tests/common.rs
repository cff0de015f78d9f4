use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::watch;

use crate::workflows::accounts::{
    ActivityError, ActivityPublisher, InMemoryActivityLog, InMemoryRecordStore, RecordId,
    RecordStore, StoreError, StoredRecord, UserActivity, UserId, UserIdentity,
};
use crate::workflows::estimation::{
    CalculationPayload, CalculatorService, DataInfrastructure, DataVolume, DeploymentModel,
    EstimationEngine, Industry, ItTeamCapacity, LicenseType, QuestionnaireAnswers, Timeline,
    TrainingLevel,
};
use crate::workflows::export::ReportMetadata;

pub(super) type MemoryCalculations = InMemoryRecordStore<CalculationPayload>;

/// Mid-size manufacturer on the default form path.
pub(super) fn scenario_a() -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        company_name: "Contoso Manufacturing".to_string(),
        users: 50,
        power_bi_license_type: LicenseType::Pro,
        premium_capacity: false,
        reports_count: 10,
        data_sources: 3,
        industry: Industry::Manufacturing,
        data_infrastructure: DataInfrastructure::Sql,
        timeline: Timeline::ThreeToSixMonths,
        it_team: ItTeamCapacity::Limited,
        training: TrainingLevel::Comprehensive,
        data_volume: DataVolume::Medium,
        cloud_vs_on_prem: DeploymentModel::Hybrid,
        system_integrations: Vec::new(),
        security_requirements: Vec::new(),
        ai_features: false,
        ..QuestionnaireAnswers::default()
    }
}

/// Inputs that add nothing to any cost line.
pub(super) fn zero_cost() -> QuestionnaireAnswers {
    QuestionnaireAnswers {
        users: 0,
        reports_count: 0,
        data_sources: 0,
        premium_capacity: false,
        ai_features: false,
        system_integrations: Vec::new(),
        security_requirements: Vec::new(),
        data_volume: DataVolume::Small,
        cloud_vs_on_prem: DeploymentModel::Other(String::new()),
        ..QuestionnaireAnswers::default()
    }
}

pub(super) fn user(uid: &str) -> UserIdentity {
    let at = Utc
        .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    UserIdentity {
        uid: UserId(uid.to_string()),
        email: format!("{uid}@contoso.com"),
        display_name: None,
        company: "Contoso".to_string(),
        role: "Analyst".to_string(),
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
    CalculatorService<MemoryCalculations, InMemoryActivityLog>,
    Arc<MemoryCalculations>,
    Arc<InMemoryActivityLog>,
) {
    let store = Arc::new(InMemoryRecordStore::new("calc"));
    let activity = Arc::new(InMemoryActivityLog::new());
    let service = CalculatorService::new(
        Arc::new(EstimationEngine::default()),
        store.clone(),
        activity.clone(),
    );
    (service, store, activity)
}

pub(super) struct FailingActivity;

impl ActivityPublisher for FailingActivity {
    fn publish(&self, _activity: UserActivity) -> Result<(), ActivityError> {
        Err(ActivityError::Unavailable("activity sink offline".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl RecordStore<CalculationPayload> for UnavailableStore {
    fn create(
        &self,
        _owner: &UserIdentity,
        _payload: CalculationPayload,
    ) -> Result<StoredRecord<CalculationPayload>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(
        &self,
        _owner: &UserIdentity,
        _id: &RecordId,
        _payload: CalculationPayload,
    ) -> Result<StoredRecord<CalculationPayload>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _owner: &UserIdentity, _id: &RecordId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _owner: &UserId) -> Result<Vec<StoredRecord<CalculationPayload>>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn subscribe(
        &self,
        _owner: &UserId,
    ) -> Result<watch::Receiver<Vec<StoredRecord<CalculationPayload>>>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
