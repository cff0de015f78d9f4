use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::QuestionnaireAnswers;
use super::rules::RulesTable;
use super::tier::{classify_with, PackageTier};

/// Unrounded cost accumulators, in calculation order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBreakdown {
    pub licensing: f64,
    pub development: f64,
    pub training: f64,
    pub infrastructure: f64,
    pub maintenance: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.licensing + self.development + self.training + self.infrastructure + self.maintenance
    }
}

/// Priced result of a questionnaire, as shown to the customer and exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub licensing_costs: u64,
    pub development_costs: u64,
    pub training_costs: u64,
    pub infrastructure_costs: u64,
    pub maintenance_costs: u64,
    /// Unrounded component sum rounded once; may differ by one unit from the
    /// sum of the rounded components.
    pub total_costs: u64,
    #[serde(rename = "timeline")]
    pub timeline_weeks: u32,
    /// Percentage; `0` when the estimate carries no cost.
    pub roi: i64,
    pub package_tier: PackageTier,
}

impl CostEstimate {
    pub fn from_breakdown(
        breakdown: &CostBreakdown,
        timeline_weeks: u32,
        roi: i64,
        package_tier: PackageTier,
    ) -> Self {
        Self {
            licensing_costs: round_currency(breakdown.licensing),
            development_costs: round_currency(breakdown.development),
            training_costs: round_currency(breakdown.training),
            infrastructure_costs: round_currency(breakdown.infrastructure),
            maintenance_costs: round_currency(breakdown.maintenance),
            total_costs: round_currency(breakdown.total()),
            timeline_weeks,
            roi,
            package_tier,
        }
    }

    /// Sum of the individually rounded components.
    pub fn component_sum(&self) -> u64 {
        self.licensing_costs
            + self.development_costs
            + self.training_costs
            + self.infrastructure_costs
            + self.maintenance_costs
    }
}

/// Stateless estimator pricing questionnaires against a rules table.
#[derive(Debug, Clone)]
pub struct EstimationEngine {
    rules: Arc<RulesTable>,
}

impl Default for EstimationEngine {
    fn default() -> Self {
        Self::new(RulesTable::standard())
    }
}

impl EstimationEngine {
    pub fn new(rules: RulesTable) -> Self {
        Self {
            rules: Arc::new(rules),
        }
    }

    pub fn rules(&self) -> &RulesTable {
        &self.rules
    }

    pub fn estimate(&self, answers: &QuestionnaireAnswers) -> CostEstimate {
        let breakdown = self.breakdown(answers);
        let timeline_weeks = self.timeline_weeks(answers);
        let roi = self.roi(answers, &breakdown);
        let package_tier = classify_with(&self.rules.tiers, answers);

        let estimate = CostEstimate::from_breakdown(&breakdown, timeline_weeks, roi, package_tier);
        debug!(
            rules_version = %self.rules.version,
            total_costs = estimate.total_costs,
            timeline_weeks,
            roi,
            tier = %estimate.package_tier,
            "estimate computed"
        );
        estimate
    }

    /// Raw accumulators before rounding.
    ///
    /// Maintenance is taken from development before the IT-team adjustment,
    /// so a weaker IT team raises development and training but not maintenance.
    pub fn breakdown(&self, answers: &QuestionnaireAnswers) -> CostBreakdown {
        let rules = &*self.rules;
        let rates = &rules.rates;
        let users = f64::from(answers.users);

        let mut licensing = rules
            .license_rate(&answers.power_bi_license_type)
            .map(|monthly| users * monthly * rates.months_per_year)
            .unwrap_or(0.0);
        if answers.premium_capacity {
            licensing += rates.premium_capacity_monthly * rates.months_per_year;
        }

        let mut development = f64::from(answers.reports_count) * rates.per_report
            + f64::from(answers.data_sources) * rates.per_data_source;
        development *= rules.industry_multiplier(&answers.industry);
        development *= rules.infrastructure_multiplier(&answers.data_infrastructure);
        development *= rules.timeline_multiplier(&answers.timeline);
        development += f64::from(answers.integration_count()) * rates.per_integration;
        development += f64::from(answers.security_requirement_count()) * rates.per_security_requirement;
        if answers.ai_features {
            development += rates.ai_features;
        }

        let mut training = if answers.wants_comprehensive_training() {
            users * rates.comprehensive_training_per_user
        } else {
            users * rates.standard_training_per_user
        };

        let mut infrastructure = 0.0;
        infrastructure += rules.data_volume_surcharge(&answers.data_volume);
        infrastructure += rules.deployment_surcharge(&answers.cloud_vs_on_prem);

        let maintenance = (development + infrastructure) * rates.maintenance_rate;

        let it_multiplier = rules.it_team_multiplier(&answers.it_team);
        development *= it_multiplier;
        training *= it_multiplier;

        CostBreakdown {
            licensing,
            development,
            training,
            infrastructure,
            maintenance,
        }
    }

    pub fn timeline_weeks(&self, answers: &QuestionnaireAnswers) -> u32 {
        let schedule = &self.rules.schedule;
        let milestones = answers.reports_count / schedule.reports_per_milestone.max(1);

        self.rules
            .base_weeks(&answers.timeline)
            .saturating_add(milestones.saturating_mul(schedule.weeks_per_milestone))
            .saturating_add(
                answers
                    .integration_count()
                    .saturating_mul(schedule.weeks_per_integration),
            )
    }

    /// First-year savings over first-year cost, as a rounded percentage.
    pub fn roi(&self, answers: &QuestionnaireAnswers, breakdown: &CostBreakdown) -> i64 {
        let total = breakdown.total();
        if total == 0.0 || !total.is_finite() {
            return 0;
        }

        let annual_savings = f64::from(answers.users) * self.rules.rates.annual_savings_per_user;
        round_half_up((annual_savings / total) * 100.0) as i64
    }
}

/// Prices answers against the standard rules table.
pub fn estimate(answers: &QuestionnaireAnswers) -> CostEstimate {
    EstimationEngine::default().estimate(answers)
}

/// Nearest integer, halves rounded towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn round_currency(value: f64) -> u64 {
    let rounded = round_half_up(value);
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u64
    } else {
        0
    }
}
