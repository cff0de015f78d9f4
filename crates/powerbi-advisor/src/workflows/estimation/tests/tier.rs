use super::common::*;
use crate::workflows::estimation::{
    classify, classify_with, estimate, PackageTier, TierLimits, TierThresholds,
};

#[test]
fn scenario_b_enterprise_user_boundary() {
    let mut answers = zero_cost();
    answers.users = 251;

    let estimate = estimate(&answers);

    assert_eq!(classify(&answers, &estimate), PackageTier::Enterprise);
    assert_eq!(estimate.package_tier, PackageTier::Enterprise);
}

#[test]
fn limits_are_exclusive() {
    let mut answers = zero_cost();
    answers.users = 250;
    answers.reports_count = 30;
    answers.system_integrations = (0..5).map(|n| format!("system-{n}")).collect();

    let estimate = estimate(&answers);
    assert_eq!(classify(&answers, &estimate), PackageTier::Professional);

    answers.users = 100;
    answers.reports_count = 15;
    answers.system_integrations.truncate(2);
    assert_eq!(classify(&answers, &estimate), PackageTier::Basic);
}

#[test]
fn any_single_dimension_upgrades_the_tier() {
    let base = zero_cost();
    let estimate = estimate(&base);

    let mut reports = base.clone();
    reports.reports_count = 16;
    assert_eq!(classify(&reports, &estimate), PackageTier::Professional);

    let mut integrations = base.clone();
    integrations.system_integrations = vec!["erp".into(), "crm".into(), "hr".into()];
    assert_eq!(classify(&integrations, &estimate), PackageTier::Professional);

    let mut many_reports = base;
    many_reports.reports_count = 31;
    assert_eq!(classify(&many_reports, &estimate), PackageTier::Enterprise);
}

#[test]
fn never_basic_above_enterprise_user_limit() {
    let estimate = estimate(&zero_cost());
    for users in [251, 300, 1_000, 50_000] {
        let mut answers = zero_cost();
        answers.users = users;
        assert_ne!(classify(&answers, &estimate), PackageTier::Basic);
    }
}

#[test]
fn custom_thresholds_are_respected() {
    let thresholds = TierThresholds {
        enterprise: TierLimits {
            users: 20,
            reports: 100,
            integrations: 100,
        },
        professional: TierLimits {
            users: 10,
            reports: 100,
            integrations: 100,
        },
    };
    let mut answers = zero_cost();
    answers.users = 15;

    assert_eq!(classify_with(&thresholds, &answers), PackageTier::Professional);
}

#[test]
fn tiers_serialize_as_labels() {
    let value = serde_json::to_value(PackageTier::Enterprise).expect("serializes");
    assert_eq!(value, serde_json::json!("Enterprise"));
    assert!(PackageTier::Basic < PackageTier::Professional);
}
