use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::QuestionnaireAnswers;
use super::engine::CostEstimate;
use super::rules::{TierLimits, TierThresholds};

/// Package recommendation, ordered from smallest to largest engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PackageTier {
    Basic,
    Professional,
    Enterprise,
}

impl PackageTier {
    pub fn label(self) -> &'static str {
        match self {
            PackageTier::Basic => "Basic",
            PackageTier::Professional => "Professional",
            PackageTier::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for PackageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recommends a package from the standard thresholds.
///
/// The estimate is accepted so callers can classify a stored result; the
/// cascade itself only looks at scale inputs.
pub fn classify(answers: &QuestionnaireAnswers, _estimate: &CostEstimate) -> PackageTier {
    classify_with(&TierThresholds::default(), answers)
}

/// First matching tier wins, checked from Enterprise down.
pub fn classify_with(thresholds: &TierThresholds, answers: &QuestionnaireAnswers) -> PackageTier {
    if exceeds(&thresholds.enterprise, answers) {
        PackageTier::Enterprise
    } else if exceeds(&thresholds.professional, answers) {
        PackageTier::Professional
    } else {
        PackageTier::Basic
    }
}

fn exceeds(limits: &TierLimits, answers: &QuestionnaireAnswers) -> bool {
    answers.users > limits.users
        || answers.reports_count > limits.reports
        || answers.integration_count() > limits.integrations
}
