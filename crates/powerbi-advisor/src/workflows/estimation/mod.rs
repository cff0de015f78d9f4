//! Cost calculator: questionnaire model, rules table, pricing engine, tier
//! classification, and the downloadable estimate report.

pub mod domain;
pub mod engine;
pub mod report;
pub mod router;
pub mod rules;
pub mod service;
pub mod tier;

#[cfg(test)]
mod tests;

pub use domain::{
    DataInfrastructure, DataVolume, DeploymentModel, Industry, ItTeamCapacity, LicenseType,
    QuestionnaireAnswers, Timeline, TrainingLevel,
};
pub use engine::{estimate, CostBreakdown, CostEstimate, EstimationEngine};
pub use report::{serialize, CompanyInfo, EstimateReport, ESTIMATE_FILE_STEM};
pub use router::{estimation_router, EstimationState};
pub use rules::{
    PricingRates, RulesError, RulesTable, ScheduleRules, TierLimits, TierThresholds,
    STANDARD_RULES_VERSION,
};
pub use service::{CalculationPayload, CalculationRecord, CalculatorService, CalculatorServiceError};
pub use tier::{classify, classify_with, PackageTier};
