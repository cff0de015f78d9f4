use std::sync::Arc;

use super::common::*;
use crate::workflows::accounts::{InMemoryActivityLog, RecordId, RecordStore, StoreError};
use crate::workflows::estimation::{
    CalculatorService, CalculatorServiceError, EstimationEngine, QuestionnaireAnswers,
};
use crate::workflows::export::ExportFormat;

#[test]
fn save_requires_signed_in_user() {
    let (service, store, activity) = build_service();

    match service.save(None, scenario_a()) {
        Err(CalculatorServiceError::NotSignedIn) => {}
        other => panic!("expected not signed in, got {other:?}"),
    }
    assert!(store.list(&user("dana").uid).expect("list").is_empty());
    assert!(activity.entries().is_empty());
}

#[test]
fn history_is_empty_without_user() {
    let (service, _, _) = build_service();
    let dana = user("dana");
    service.save(Some(&dana), scenario_a()).expect("save succeeds");

    assert!(service.history(None).expect("history").is_empty());
    assert_eq!(service.history(Some(&dana)).expect("history").len(), 1);
}

#[test]
fn save_stores_priced_payload_and_logs_activity() {
    let (service, _, activity) = build_service();
    let dana = user("dana");

    let record = service
        .save(Some(&dana), scenario_a())
        .expect("save succeeds");

    assert_eq!(record.user_id, dana.uid);
    assert_eq!(record.payload.company_name, "Contoso Manufacturing");
    assert_eq!(record.payload.cost_breakdown.total_costs, 77796);

    let entries = activity.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "calculation_saved");
    assert_eq!(entries[0].page, "cost-calculator");
    assert_eq!(entries[0].details["calculationId"], record.id.0.as_str());
}

#[test]
fn update_reprices_the_stored_run() {
    let (service, _, _) = build_service();
    let dana = user("dana");
    let record = service
        .save(Some(&dana), scenario_a())
        .expect("save succeeds");

    let mut edited = scenario_a();
    edited.users = 300;
    let updated = service
        .update(Some(&dana), &record.id, edited)
        .expect("update succeeds");

    assert_eq!(updated.id, record.id);
    assert_eq!(updated.payload.requirements.users, 300);
    assert!(updated.payload.cost_breakdown.total_costs > 77796);
    assert_eq!(
        updated.payload.cost_breakdown.package_tier,
        crate::workflows::estimation::PackageTier::Enterprise
    );
}

#[test]
fn other_users_cannot_modify_records() {
    let (service, _, _) = build_service();
    let record = service
        .save(Some(&user("dana")), scenario_a())
        .expect("save succeeds");

    match service.delete(Some(&user("lee")), &record.id) {
        Err(CalculatorServiceError::Store(StoreError::Forbidden(id))) => {
            assert_eq!(id, record.id)
        }
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn delete_removes_from_history() {
    let (service, _, _) = build_service();
    let dana = user("dana");
    let record = service
        .save(Some(&dana), scenario_a())
        .expect("save succeeds");

    service.delete(Some(&dana), &record.id).expect("delete succeeds");

    assert!(service.history(Some(&dana)).expect("history").is_empty());
    match service.delete(Some(&dana), &record.id) {
        Err(CalculatorServiceError::Store(StoreError::NotFound(_))) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn activity_failures_do_not_fail_saves() {
    let store = Arc::new(MemoryCalculations::new("calc"));
    let service = CalculatorService::new(
        Arc::new(EstimationEngine::default()),
        store.clone(),
        Arc::new(FailingActivity),
    );
    let dana = user("dana");

    let record = service
        .save(Some(&dana), scenario_a())
        .expect("save succeeds despite activity failure");

    assert_eq!(store.list(&dana.uid).expect("list")[0].id, record.id);
}

#[test]
fn store_outages_propagate() {
    let service = CalculatorService::new(
        Arc::new(EstimationEngine::default()),
        Arc::new(UnavailableStore),
        Arc::new(InMemoryActivityLog::new()),
    );
    let dana = user("dana");

    assert!(matches!(
        service.save(Some(&dana), scenario_a()),
        Err(CalculatorServiceError::Store(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        service.history(Some(&dana)),
        Err(CalculatorServiceError::Store(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        service.update(Some(&dana), &RecordId("calc-1".to_string()), scenario_a()),
        Err(CalculatorServiceError::Store(_))
    ));
}

#[test]
fn export_logs_activity_only_for_signed_in_users() {
    let (service, _, activity) = build_service();
    let metadata = fixed_metadata();

    let anonymous = service
        .export(None, &scenario_a(), ExportFormat::Json, &metadata)
        .expect("export succeeds");
    assert_eq!(anonymous.file_name, "powerbi-cost-estimate-1717243200250.json");
    assert!(activity.entries().is_empty());

    service
        .export(Some(&user("dana")), &scenario_a(), ExportFormat::Csv, &metadata)
        .expect("export succeeds");
    let entries = activity.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "report_exported");
    assert_eq!(entries[0].details["format"], "csv");
}

#[tokio::test]
async fn history_watchers_see_saves() {
    let (service, _, _) = build_service();
    let dana = user("dana");
    let mut receiver = service.watch_history(&dana).expect("subscribe");

    let record = service
        .save(Some(&dana), QuestionnaireAnswers::default())
        .expect("save succeeds");

    receiver.changed().await.expect("snapshot published");
    assert_eq!(receiver.borrow()[0].id, record.id);
}
